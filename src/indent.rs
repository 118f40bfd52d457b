//! インデント処理

/// 行頭の空白（インデント）を取得
pub fn leading_indent(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(idx, _)| idx)
        .unwrap_or(line.len());
    &line[..end]
}

/// 先頭の空白を除去
pub fn strip_leading_whitespace(text: &str) -> &str {
    text.trim_start()
}

/// 複数行テンプレートの各行にインデントを付与する
///
/// 1行目は既存の先頭空白を除いてから付与し、インデントの二重化を防ぐ。
/// 2行目以降はテンプレートの空白をそのまま残す。
pub fn indent_block(text: &str, indent: &str) -> String {
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                format!("{}{}", indent, strip_leading_whitespace(line))
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_indent_variants() {
        assert_eq!(leading_indent("    /d "), "    ");
        assert_eq!(leading_indent("\t\t/d"), "\t\t");
        assert_eq!(leading_indent("/d"), "");
        assert_eq!(leading_indent("   "), "   ");
        assert_eq!(leading_indent(""), "");
    }

    #[test]
    fn indent_block_prefixes_every_line() {
        let out = indent_block("  // begin\nbody\n  end", "\t");
        assert_eq!(out, "\t// begin\n\tbody\n\t  end");
    }

    #[test]
    fn indent_block_single_line() {
        assert_eq!(indent_block("value", "    "), "    value");
        assert_eq!(indent_block("", "  "), "  ");
    }
}
