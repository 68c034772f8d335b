use std::fmt::{self, Write};

/// 空白字符折叠 + 截断 - 零堆分配的日志预览
/// 适用于在日志里展示模块源码片段
#[inline(always)]
pub fn preview_compact<'a>(s: &'a str, max_len: usize) -> impl fmt::Display + 'a {
    struct CompactView<'a> {
        source: &'a str,
        max_length: usize,
    }

    impl fmt::Display for CompactView<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut char_count = 0;
            let mut last_was_whitespace = false;

            for ch in self.source.chars() {
                if char_count >= self.max_length {
                    f.write_str("…")?;
                    break;
                }

                if ch.is_whitespace() {
                    if !last_was_whitespace {
                        f.write_char(' ')?;
                        char_count += 1;
                        last_was_whitespace = true;
                    }
                } else {
                    f.write_char(ch)?;
                    char_count += 1;
                    last_was_whitespace = false;
                }
            }
            Ok(())
        }
    }

    CompactView {
        source: s,
        max_length: max_len,
    }
}

/// 模块名列表日志格式化：[a, b, ...] (total: N)
pub fn compress_module_list<S: AsRef<str>>(modules: &[S]) -> String {
    if modules.is_empty() {
        return "[empty]".to_string();
    }

    const MAX_COUNT: usize = 10;
    const MAX_NAME_LEN: usize = 40;

    let mut result = String::with_capacity(MAX_COUNT * 16);
    result.push('[');
    for (idx, module) in modules.iter().take(MAX_COUNT).enumerate() {
        if idx > 0 {
            result.push_str(", ");
        }
        let _ = write!(result, "{}", preview_compact(module.as_ref(), MAX_NAME_LEN));
    }
    if modules.len() > MAX_COUNT {
        let _ = write!(result, "… (total: {})", modules.len());
    }
    result.push(']');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_collapses_whitespace() {
        let text = "import  os\n\n\tx = 1";
        assert_eq!(preview_compact(text, 100).to_string(), "import os x = 1");
        assert_eq!(preview_compact(text, 6).to_string(), "import…");
        assert_eq!(preview_compact("", 6).to_string(), "");
    }

    #[test]
    fn test_compress_module_list() {
        assert_eq!(compress_module_list::<&str>(&[]), "[empty]");
        assert_eq!(compress_module_list(&["sip", "PyQt5.QtGui"]), "[sip, PyQt5.QtGui]");
        let many: Vec<String> = (0..12).map(|i| format!("m{}", i)).collect();
        assert!(compress_module_list(&many).ends_with("… (total: 12)]"));
    }
}
