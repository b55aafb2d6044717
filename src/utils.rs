use rand::Rng;
use std::cmp::Ordering;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Maps Portuguese accented letters to their base letter. Other characters pass through.
pub fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}

pub fn fold_accents(text: &str) -> String {
    text.chars().map(fold_accent).collect()
}

/// Upper-cased, trimmed, accent-free form used for lenient name comparisons.
pub fn normalize_key(text: &str) -> String {
    fold_accents(text.trim()).to_uppercase()
}

/// Orders names the way a pt-BR collator would for our data: base letters first,
/// then accents, then case.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let primary = fold_accents(&a.to_lowercase()).cmp(&fold_accents(&b.to_lowercase()));
    primary
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// 64-bit FNV-1a over the UTF-8 bytes of `value`. Fixed across builds and platforms, so
/// ids derived from it can be persisted.
pub fn stable_hash_str(value: &str) -> u64 {
    value.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Renders the low digits of `value` in base 36, left-padded with zeros to `width`.
pub fn to_base36(mut value: u64, width: usize) -> String {
    let mut digits = vec![b'0'; width];
    for slot in digits.iter_mut().rev() {
        *slot = BASE36_DIGITS[(value % 36) as usize];
        value /= 36;
    }
    digits.into_iter().map(char::from).collect()
}

pub fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(BASE36_DIGITS[rng.gen_range(0..36)]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("GOIÁS"), "GOIAS");
        assert_eq!(fold_accents("São Paulo"), "Sao Paulo");
        assert_eq!(fold_accents("CONCÓRDIA"), "CONCORDIA");
        assert_eq!(normalize_key("  Paraná "), "PARANA");
    }

    #[test]
    fn test_compare_names_is_accent_insensitive_first() {
        let mut names = vec!["SAO PAULO", "PARANÁ", "GOIÁS", "GOIAS", "MATO GROSSO", "NORDESTE"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(
            names,
            vec!["GOIAS", "GOIÁS", "MATO GROSSO", "NORDESTE", "PARANÁ", "SAO PAULO"]
        );
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0, 4), "0000");
        assert_eq!(to_base36(35, 2), "0z");
        assert_eq!(to_base36(36, 2), "10");
        assert_eq!(to_base36(36 * 36 * 36 * 36 + 1, 4), "0001");

        let mut rng = rand::thread_rng();
        let id = random_base36(&mut rng, 9);
        assert_eq!(id.len(), 9);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_stable_hash_repeats() {
        assert_eq!(stable_hash_str("NORDESTE"), stable_hash_str("NORDESTE"));
        assert_ne!(stable_hash_str("NORDESTE"), stable_hash_str("GOIÁS"));
    }

    #[test]
    fn test_stable_hash_known_values() {
        assert_eq!(stable_hash_str(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(stable_hash_str("a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(stable_hash_str("NORDESTE"), 0x9914_5fa7_b894_ac2b);
    }
}
