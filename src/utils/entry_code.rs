use rand::Rng;

/// 入班码字母表：32 个字符，排除易混淆的 0、1、I、O
const ENTRY_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// 入班码长度
const ENTRY_CODE_LEN: usize = 6;

/// 生成入班码
///
/// 仅保证可读性和足够低的碰撞概率，非加密用途；
/// 全局唯一性由数据库唯一约束兜底，冲突时调用方重试。
pub fn generate_entry_code() -> String {
    let mut rng = rand::rng();
    (0..ENTRY_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ENTRY_CODE_ALPHABET.len());
            ENTRY_CODE_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length() {
        assert_eq!(generate_entry_code().len(), 6);
    }

    #[test]
    fn test_alphabet_size_and_confusables_excluded() {
        assert_eq!(ENTRY_CODE_ALPHABET.len(), 32);
        for confusable in [b'0', b'1', b'I', b'O'] {
            assert!(!ENTRY_CODE_ALPHABET.contains(&confusable));
        }
    }

    #[test]
    fn test_code_is_uppercase_alphanumeric() {
        for _ in 0..100 {
            let code = generate_entry_code();
            assert!(
                code.bytes().all(|b| ENTRY_CODE_ALPHABET.contains(&b)),
                "unexpected character in code: {code}"
            );
            assert_eq!(code, code.to_uppercase());
        }
    }
}
