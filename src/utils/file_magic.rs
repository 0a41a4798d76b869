//! 根据文件头识别上传文件的真实类型

/// 已知文件头
const SIGNATURES: &[(&str, &[u8])] = &[
    ("png", &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
    ("jpg", &[0xFF, 0xD8, 0xFF]),
    ("gif", b"GIF87a"),
    ("gif", b"GIF89a"),
    ("bmp", b"BM"),
    ("pdf", b"%PDF"),
    // OLE 复合文档（doc/xls/ppt）
    ("ole", &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
    // ZIP（docx/xlsx/pptx/odt）
    ("zip", &[0x50, 0x4B, 0x03, 0x04]),
    ("mp3", b"ID3"),
    ("ogg", b"OggS"),
];

/// 识别文件头，返回签名族名称
pub fn detect_signature(data: &[u8]) -> Option<&'static str> {
    if data.len() >= 12 && &data[0..4] == b"RIFF" {
        return match &data[8..12] {
            b"WEBP" => Some("webp"),
            b"WAVE" => Some("wav"),
            _ => None,
        };
    }
    SIGNATURES
        .iter()
        .find(|(_, magic)| data.starts_with(magic))
        .map(|(name, _)| *name)
}

/// 扩展名（不含点）对应的签名族；`None` 表示纯文本类型，不校验文件头
fn expected_signature(extension: &str) -> Option<Option<&'static str>> {
    let family = match extension {
        "png" => "png",
        "jpg" | "jpeg" => "jpg",
        "gif" => "gif",
        "webp" => "webp",
        "bmp" => "bmp",
        "pdf" => "pdf",
        "doc" | "xls" | "ppt" => "ole",
        "docx" | "xlsx" | "pptx" | "odt" | "ods" | "odp" => "zip",
        "mp3" => "mp3",
        "ogg" => "ogg",
        "wav" => "wav",
        "txt" | "md" | "csv" => return Some(None),
        _ => return None,
    };
    Some(Some(family))
}

/// 文件内容是否与扩展名相符
///
/// `extension` 不含点号，大小写不敏感；未知扩展名一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }
    match expected_signature(&extension.trim_start_matches('.').to_lowercase()) {
        Some(Some(family)) => detect_signature(data) == Some(family),
        Some(None) => std::str::from_utf8(data).is_ok() || !data.contains(&0),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

    #[test]
    fn test_detect_signature() {
        assert_eq!(detect_signature(PNG), Some("png"));
        assert_eq!(detect_signature(b"RIFF\0\0\0\0WEBPVP8 "), Some("webp"));
        assert_eq!(detect_signature(b"%PDF-1.7"), Some("pdf"));
        assert_eq!(detect_signature(b"hello"), None);
    }

    #[test]
    fn test_image_extensions() {
        assert!(validate_magic_bytes(PNG, "png"));
        assert!(validate_magic_bytes(PNG, ".PNG"));
        assert!(!validate_magic_bytes(PNG, "jpg"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], "jpeg"));
    }

    #[test]
    fn test_office_documents() {
        assert!(validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x14], "docx"));
        assert!(!validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x14], "doc"));
    }

    #[test]
    fn test_text_files_and_binary_disguise() {
        assert!(validate_magic_bytes("Leçon 1".as_bytes(), "txt"));
        assert!(!validate_magic_bytes(&[0xFF, 0x00, 0xFE], "txt"));
    }

    #[test]
    fn test_empty_or_unknown() {
        assert!(!validate_magic_bytes(&[], "png"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", "exe"));
    }
}
