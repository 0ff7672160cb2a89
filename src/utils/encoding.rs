use encoding_rs::GB18030;

pub fn gb18030_to_utf8(bytes: &[u8]) -> String {
    let (cow, _, _) = GB18030.decode(bytes);
    cow.into_owned()
}

/// 接口大多返回 UTF-8，个别老接口仍是 GB18030，按字节内容兜底
pub fn decode_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => gb18030_to_utf8(bytes),
    }
}
