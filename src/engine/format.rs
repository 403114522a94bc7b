// ==========================================
// 销售执行人业绩分析 - 展示格式化
// ==========================================
// 职责: 金额/百分比/文本的展示字符串
// 红线: 只读取数值生成字符串,不回写聚合结果
// ==========================================

/// 缺失值占位符
pub const MISSING: &str = "—";

/// 空文本占位符
pub const NOT_AVAILABLE: &str = "N/A";

/// 默认截断长度
pub const DEFAULT_TRUNCATE_LEN: usize = 20;

/// 智利比索格式: `$1.234.567`,四舍五入到整数,负数为 `-$1.234`
pub fn format_money(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return MISSING.to_string();
    };

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect::<Vec<_>>()
        .join(".");

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// 百分比: 一位小数 + `%`
pub fn format_pct(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.1}%", v),
        None => MISSING.to_string(),
    }
}

/// 截断文本（按字符计数）,超长追加 `...`;空白文本返回 `N/A`
pub fn truncate_text(text: Option<&str>, max_len: usize) -> String {
    match text {
        Some(t) if !t.is_empty() => {
            if t.chars().count() > max_len {
                format!("{}...", t.chars().take(max_len).collect::<String>())
            } else {
                t.to_string()
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// 首个单词（按空白切分）
pub fn first_word(text: Option<&str>) -> String {
    text.and_then(|t| t.split_whitespace().next())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Some(1234567.0)), "$1.234.567");
        assert_eq!(format_money(Some(999.4)), "$999");
        assert_eq!(format_money(Some(999.5)), "$1.000");
        assert_eq!(format_money(Some(0.0)), "$0");
        assert_eq!(format_money(Some(-0.2)), "$0");
        assert_eq!(format_money(Some(-2500.0)), "-$2.500");
        assert_eq!(format_money(None), MISSING);
        assert_eq!(format_money(Some(f64::NAN)), MISSING);
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(Some(12.345)), "12.3%");
        assert_eq!(format_pct(Some(-5.0)), "-5.0%");
        assert_eq!(format_pct(None), MISSING);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text(Some("Comercial Andina Limitada"), DEFAULT_TRUNCATE_LEN), "Comercial Andina Lim...");
        assert_eq!(truncate_text(Some("Acme"), DEFAULT_TRUNCATE_LEN), "Acme");
        assert_eq!(truncate_text(Some("Peñalolén"), 3), "Peñ...");
        assert_eq!(truncate_text(Some(""), 5), NOT_AVAILABLE);
        assert_eq!(truncate_text(None, 5), NOT_AVAILABLE);
    }

    #[test]
    fn test_first_word() {
        assert_eq!(first_word(Some("  Ana María ")), "Ana");
        assert_eq!(first_word(Some("   ")), NOT_AVAILABLE);
        assert_eq!(first_word(None), NOT_AVAILABLE);
    }
}
