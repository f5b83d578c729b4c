/// 按字符截取前 `max_chars` 个字符（不追加省略号）
///
/// 原文常为韩语，按字节截断会切在多字节字符中间。
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
