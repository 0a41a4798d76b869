//! 输入校验

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{5,16}$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "azerty123",
    "qwerty123",
    "motdepasse1",
    "bonjour123",
    "soleil123",
];

/// 用户名：5-16 位字母、数字、下划线或连字符
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !USERNAME_RE.is_match(username) {
        return Err(
            "Username must be 5 to 16 characters of letters, numbers, underscores or hyphens",
        );
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略：至少 8 位，含大小写字母与数字，且不在常见弱密码表中
///
/// 返回全部未满足的规则
pub fn validate_password(password: &str) -> Result<(), Vec<&'static str>> {
    let checks: [(bool, &'static str); 5] = [
        (
            password.chars().count() >= 8,
            "Password must be at least 8 characters long",
        ),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one digit",
        ),
        (
            !COMMON_PASSWORDS
                .iter()
                .any(|weak| password.eq_ignore_ascii_case(weak)),
            "Password is too common, please choose a stronger password",
        ),
    ];

    let failures: Vec<&'static str> = checks
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, msg)| msg)
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

/// 非空且不超过给定长度的标题类字段
pub fn validate_title(value: &str, max_chars: usize) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Title must not be empty".to_string());
    }
    if trimmed.chars().count() > max_chars {
        return Err(format!("Title must be at most {max_chars} characters"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("eleve_01").is_ok());
        assert!(validate_username("prof-martin").is_ok());
        assert!(validate_username("abcd").is_err());
        assert!(validate_username("a_very_long_username").is_err());
        assert!(validate_username("élève01").is_err());
        assert!(validate_username("with space").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("prof@ecole.fr").is_ok());
        assert!(validate_email("prof@ecole").is_err());
        assert!(validate_email("@ecole.fr").is_err());
    }

    #[test]
    fn test_password_reports_every_failure() {
        let failures = validate_password("abc").unwrap_err();
        assert!(failures.contains(&"Password must be at least 8 characters long"));
        assert!(failures.contains(&"Password must contain at least one uppercase letter"));
        assert!(failures.contains(&"Password must contain at least one digit"));
        assert!(!failures.contains(&"Password must contain at least one lowercase letter"));
    }

    #[test]
    fn test_common_password_rejected() {
        let failures = validate_password("Azerty123").unwrap_err();
        assert_eq!(
            failures,
            vec!["Password is too common, please choose a stronger password"]
        );
        assert!(validate_password("Classe2024Num").is_ok());
    }

    #[test]
    fn test_title_trimmed_and_bounded() {
        assert_eq!(validate_title("  CM1 A ", 50).unwrap(), "CM1 A");
        assert!(validate_title("   ", 50).is_err());
        assert!(validate_title("abcdef", 5).is_err());
    }
}
