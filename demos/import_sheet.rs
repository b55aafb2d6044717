use freight_zone_dashboard::{parse_csv_text, Dashboard, DashboardConfig};
use std::env;
use std::fs;

const SAMPLE: &str = "CIRCUITO,ORIGEM,DESTINO,PROGRAMADOR,,META,,REALIZADO,FATURAMENTO,BONIFICAÇÃO\n\
                      C1,GOIÁS,Campinas - SP,LUCAS,,\"1.200\",,\"1.150\",\"R$ 48.300,10\",\"R$ 2.100,00\"\n\
                      C2,PERNAMBUCO,Recife - PE,,,500,,510,\"R$ 15.000,00\",\n\
                      C3,PERNAMBUCO / PARAIBA / ALAGOAS,João Pessoa - PB,MARIA,,220,,200,\"R$ 6.400,00\",\n\
                      TOTAL,TOTAL GERAL,,,,1920,,1860,,\n";

fn main() -> anyhow::Result<()> {
    let text = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };

    let mut dashboard = Dashboard::new(DashboardConfig::default())?;
    dashboard.sync_with(|url| {
        println!("Reading sheet (configured source: {})", url);
        Ok(text.clone())
    })?;

    for zone in dashboard.zones() {
        println!(
            "{} [{}] programmer={} routes={} revenue={:.2} bonus={:.2} region={:?}",
            zone.name,
            zone.id,
            zone.programmer,
            zone.routes.len(),
            zone.financial_revenue,
            zone.financial_bonus,
            zone.region_code()
        );
        for route in &zone.routes {
            println!(
                "  {} {} -> {} meta={} realizado={}",
                route.id, route.origin, route.destination, route.contracted_volume, route.realized_volume
            );
        }
    }

    // A manual import of the same file announces nothing new.
    let announced = dashboard.apply_manual_import(parse_csv_text(&text)?);
    println!("New routes on re-import: {}", announced);

    println!("{}", dashboard.snapshot().to_json()?);
    Ok(())
}
