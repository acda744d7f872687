//! Regex fallback extraction strategies.
//!
//! Three independent strategies tried in fixed priority order, each a plain
//! function returning `Option<ExtractedData>`; first success wins. No
//! exception-based control flow — a miss is `None`, never an error.
//!
//! Confidence per strategy (bracketed 0.7, key:value 0.8, simple list 0.6)
//! preserves the relative ordering downstream validity gating relies on.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{parse_number, DataRow, DataValue, ExtractedData, ExtractionMethod};

const BRACKETED_CONFIDENCE: f32 = 0.7;
const KEY_VALUE_CONFIDENCE: f32 = 0.8;
const SIMPLE_LIST_CONFIDENCE: f32 = 0.6;

const CN_WEEKDAYS: &[&str] = &["周一", "周二", "周三", "周四", "周五", "周六", "周日"];
const EN_WEEKDAYS: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// Try every strategy in priority order.
pub fn extract_with_patterns(prompt: &str) -> Option<ExtractedData> {
    extract_bracketed_list(prompt)
        .or_else(|| extract_key_value(prompt))
        .or_else(|| extract_simple_list(prompt))
}

fn bracketed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)\s*[\[【]([^\]】]+)[\]】]").unwrap())
}

/// `label[v1, v2, ...]` repeated: one column per label, one row per slot.
///
/// Slot labels come from keyword hints in the prompt (weekday names when
/// present, ordinal day labels otherwise), bounded by the longest value list.
pub fn extract_bracketed_list(prompt: &str) -> Option<ExtractedData> {
    let mut series: Vec<(String, Vec<DataValue>)> = Vec::new();

    for caps in bracketed_regex().captures_iter(prompt) {
        let label = caps[1].to_string();
        let values: Vec<DataValue> = caps[2]
            .split([',', '，', '、'])
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| parse_number(v).map_or_else(|| DataValue::Text(v.to_string()), DataValue::Number))
            .collect();
        if !values.is_empty() {
            series.push((label, values));
        }
    }

    if series.is_empty() {
        return None;
    }

    let slots = series.iter().map(|(_, v)| v.len()).max()?;
    let labels = slot_labels(prompt, slots);

    let mut warnings = Vec::new();
    if series.iter().any(|(_, v)| v.len() != slots) {
        warnings.push("series have unequal lengths; missing slots treated as null".to_string());
    }

    let data: Vec<DataRow> = (0..slots)
        .map(|i| {
            let mut row: DataRow = DataRow::new();
            row.insert("time".to_string(), DataValue::Text(labels[i].clone()));
            for (label, values) in &series {
                row.insert(label.clone(), values.get(i).cloned().unwrap_or(DataValue::Null));
            }
            row
        })
        .collect();

    Some(ExtractedData {
        data,
        confidence: BRACKETED_CONFIDENCE,
        extraction_method: ExtractionMethod::RegexPattern,
        warnings,
    })
}

/// Time-axis labels inferred from keyword hints in the prompt.
fn slot_labels(prompt: &str, slots: usize) -> Vec<String> {
    if CN_WEEKDAYS.iter().any(|d| prompt.contains(d)) || prompt.contains("星期") {
        (0..slots).map(|i| CN_WEEKDAYS[i % 7].to_string()).collect()
    } else if EN_WEEKDAYS
        .iter()
        .any(|d| prompt.to_lowercase().contains(&d.to_lowercase()))
    {
        (0..slots).map(|i| EN_WEEKDAYS[i % 7].to_string()).collect()
    } else {
        (0..slots).map(|i| format!("Day {}", i + 1)).collect()
    }
}

fn key_value_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\w+)\s*[:：]\s*([0-9]+(?:\.[0-9]+)?)\s*(万|千|百)?\s*(元|美元|人民币|人|名|个|件|次|台|辆|%|％)?")
            .unwrap()
    })
}

/// `label: number unit?` repeated: one row per match, generic field names
/// inferred from the label shape and the unit, scale suffixes applied
/// (万 ×10 000, 千 ×1 000, 百 ×100).
///
/// Declines (returns `None`) when any matched number is followed by another
/// comma-separated number — that shape belongs to the simple-list strategy.
/// The regex crate has no look-ahead, so the suffix is checked after the
/// match instead.
pub fn extract_key_value(prompt: &str) -> Option<ExtractedData> {
    let mut entries: Vec<(String, f64, Option<String>)> = Vec::new();

    for caps in key_value_regex().captures_iter(prompt) {
        let end = caps.get(0)?.end();
        if followed_by_list_item(&prompt[end..]) {
            return None;
        }

        let label = caps[1].to_string();
        let number: f64 = caps[2].parse().ok()?;
        let multiplier = match caps.get(3).map(|m| m.as_str()) {
            Some("万") => 10_000.0,
            Some("千") => 1_000.0,
            Some("百") => 100.0,
            _ => 1.0,
        };
        let unit = caps.get(4).map(|m| m.as_str().to_string());
        entries.push((label, number * multiplier, unit));
    }

    if entries.len() < 2 {
        return None;
    }

    let labels: Vec<&str> = entries.iter().map(|(l, _, _)| l.as_str()).collect();
    let category_field = category_field_name(&labels);
    let value_field = value_field_name(entries.iter().filter_map(|(_, _, u)| u.as_deref()));

    let data: Vec<DataRow> = entries
        .iter()
        .map(|(label, value, _)| {
            let mut row = DataRow::new();
            row.insert(category_field.to_string(), DataValue::Text(label.clone()));
            row.insert(value_field.to_string(), DataValue::Number(*value));
            row
        })
        .collect();

    Some(ExtractedData {
        data,
        confidence: KEY_VALUE_CONFIDENCE,
        extraction_method: ExtractionMethod::RegexPattern,
        warnings: Vec::new(),
    })
}

fn followed_by_list_item(rest: &str) -> bool {
    let rest = rest.trim_start();
    let Some(tail) = rest.strip_prefix([',', '，']) else {
        return false;
    };
    tail.trim_start().chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Infer a generic category-field name from how the labels look.
fn category_field_name(labels: &[&str]) -> &'static str {
    let majority = labels.len() / 2 + 1;
    let count = |pred: fn(&str) -> bool| labels.iter().filter(|l| pred(l)).count();

    if count(looks_like_month) >= majority {
        "month"
    } else if count(looks_like_quarter) >= majority {
        "quarter"
    } else if count(looks_like_year) >= majority {
        "year"
    } else if count(|l| crate::inference::parse_date(l).is_some()) >= majority {
        "date"
    } else if count(looks_like_week) >= majority {
        "week"
    } else if count(looks_like_region) >= majority {
        "region"
    } else if count(looks_like_product) >= majority {
        "product"
    } else if count(looks_like_department) >= majority {
        "department"
    } else {
        "category"
    }
}

fn looks_like_month(label: &str) -> bool {
    const EN_MONTHS: &[&str] = &[
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lower = label.to_lowercase();
    label.ends_with('月') || lower == "month" || EN_MONTHS.iter().any(|m| lower.starts_with(m))
}

fn looks_like_quarter(label: &str) -> bool {
    let lower = label.to_lowercase();
    label.contains("季度")
        || label.contains('季')
        || (lower.starts_with('q') && lower[1..].chars().all(|c| c.is_ascii_digit()))
}

fn looks_like_year(label: &str) -> bool {
    label.ends_with('年') || (label.len() == 4 && label.chars().all(|c| c.is_ascii_digit()))
}

fn looks_like_week(label: &str) -> bool {
    label.contains('周') || label.contains("星期") || label.to_lowercase().contains("week")
}

fn looks_like_region(label: &str) -> bool {
    const REGIONS: &[&str] = &[
        "北京", "上海", "广州", "深圳", "杭州", "成都", "武汉", "南京", "西安", "重庆",
    ];
    REGIONS.contains(&label)
        || label.ends_with('省')
        || label.ends_with('市')
        || label.ends_with('区')
}

fn looks_like_product(label: &str) -> bool {
    label.contains("产品") || label.to_lowercase().contains("product")
}

fn looks_like_department(label: &str) -> bool {
    label.ends_with('部') || label.contains("部门") || label.to_lowercase().contains("department")
}

/// Infer a generic value-field name from the units attached to the numbers.
fn value_field_name<'a>(units: impl Iterator<Item = &'a str>) -> &'static str {
    for unit in units {
        match unit {
            "元" | "美元" | "人民币" => return "amount",
            "人" | "名" => return "headcount",
            "个" | "件" | "台" | "辆" => return "quantity",
            "次" => return "count",
            _ => {}
        }
    }
    "value"
}

fn simple_list_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\w+)\s*[:：]\s*((?:[0-9]+(?:\.[0-9]+)?\s*[,，]\s*)+[0-9]+(?:\.[0-9]+)?)")
            .unwrap()
    })
}

/// `label: n1, n2, n3` repeated: one row per position across all matched
/// labels, synthetic `类别{n}` category names.
pub fn extract_simple_list(prompt: &str) -> Option<ExtractedData> {
    let mut series: Vec<(String, Vec<f64>)> = Vec::new();

    for caps in simple_list_regex().captures_iter(prompt) {
        let label = caps[1].to_string();
        let values: Vec<f64> = caps[2]
            .split([',', '，'])
            .filter_map(|v| parse_number(v))
            .collect();
        if values.len() >= 2 {
            series.push((label, values));
        }
    }

    if series.is_empty() {
        return None;
    }

    let positions = series.iter().map(|(_, v)| v.len()).max()?;
    let data: Vec<DataRow> = (0..positions)
        .map(|i| {
            let mut row = DataRow::new();
            row.insert(
                "category".to_string(),
                DataValue::Text(format!("类别{}", i + 1)),
            );
            for (label, values) in &series {
                row.insert(
                    label.clone(),
                    values.get(i).map_or(DataValue::Null, |v| DataValue::Number(*v)),
                );
            }
            row
        })
        .collect();

    Some(ExtractedData {
        data,
        confidence: SIMPLE_LIST_CONFIDENCE,
        extraction_method: ExtractionMethod::RegexPattern,
        warnings: Vec::new(),
    })
}
