//! 随机码生成

use rand::Rng;

/// 访问码字符集，去掉易混淆的 0/O、1/I/L
pub const ACCESS_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const ACCESS_CODE_LENGTH: usize = 8;

pub fn generate_code(alphabet: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// 班级访问码
pub fn generate_access_code() -> String {
    generate_code(ACCESS_CODE_ALPHABET, ACCESS_CODE_LENGTH)
}

/// 规整用户输入的访问码：去空白并转大写
pub fn normalize_access_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// 初始管理员密码，保证满足密码策略
pub fn generate_initial_password() -> String {
    const LOWER_ALPHANUMERIC: &[u8] = b"abcdefghijkmnopqrstuvwxyz23456789";
    format!(
        "{}{}{}",
        generate_code(b"ABCDEFGHJKLMNPQRSTUVWXYZ", 1),
        generate_code(b"23456789", 1),
        generate_code(LOWER_ALPHANUMERIC, 14)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_access_code_shape() {
        for _ in 0..50 {
            let code = generate_access_code();
            assert_eq!(code.len(), ACCESS_CODE_LENGTH);
            assert!(code.bytes().all(|b| ACCESS_CODE_ALPHABET.contains(&b)));
            assert!(!code.contains('O') && !code.contains('0') && !code.contains('I'));
        }
    }

    #[test]
    fn test_normalize_access_code() {
        assert_eq!(normalize_access_code("  ab3k9xyz "), "AB3K9XYZ");
    }

    #[test]
    fn test_initial_password_meets_policy() {
        for _ in 0..20 {
            let password = generate_initial_password();
            assert_eq!(password.len(), 16);
            assert!(validate_password(&password).is_ok(), "{password}");
        }
    }
}
