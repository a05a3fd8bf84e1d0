//! Builds wire query terms. Every term is emitted with a leading `&`.

use crate::config::{ResourceOverride, SearchRule};
use crate::query::{flatten, FilterTree, FilterValue, Leaf, Pagination, Scalar, Sort, SortOrder};
use std::collections::HashMap;

/// Top-level filter key passed through as `option` terms instead of a field comparison.
pub const OPTION_FIELD: &str = "option";

fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Strings wrapped in parentheses are pre-formed wire expressions.
fn is_preformed(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('(') && s.ends_with(')')
}

/// `option` terms: one per list element, `option[key]=value` per map entry, else a single term.
/// Null values, elements and entries are skipped like null filter leaves.
pub fn option_terms(value: &FilterValue) -> String {
    match value {
        FilterValue::List(items) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| format!("&{}={}", OPTION_FIELD, v.element_text()))
            .collect(),
        FilterValue::Map(entries) => entries
            .iter()
            .filter(|(_, v)| !matches!(v, FilterValue::Scalar(Scalar::Null)))
            .map(|(k, v)| format!("&{}[{}]={}", OPTION_FIELD, k, plain_text(v)))
            .collect(),
        FilterValue::Scalar(Scalar::Null) => String::new(),
        FilterValue::Scalar(s) => format!("&{}={}", OPTION_FIELD, s),
    }
}

fn plain_text(value: &FilterValue) -> String {
    match value {
        FilterValue::Scalar(s) => s.to_string(),
        FilterValue::List(items) => items.iter().map(Scalar::element_text).collect::<Vec<_>>().join(","),
        FilterValue::Map(entries) => {
            let inner: Vec<String> = entries.iter().map(|(k, v)| format!("{}:{}", k, plain_text(v))).collect();
            format!("{{{}}}", inner.join(","))
        }
    }
}

/// Filter terms for a declarative resource. Removes nothing from the caller's tree.
///
/// `search` is the resource's search table; `None` selects the plain encoding used by
/// resources without any search overrides.
pub fn filter_terms(filter: &FilterTree, search: Option<&HashMap<String, SearchRule>>) -> String {
    let mut out = String::new();
    let mut remainder = filter.clone();
    if let Some(option) = remainder.remove(OPTION_FIELD) {
        out.push_str(&option_terms(&option));
    }
    let flat = flatten(&remainder);
    for (field, value) in flat.iter() {
        if value.is_null() {
            continue;
        }
        match search {
            Some(table) => {
                match table.get(field) {
                    Some(rule) => {
                        out.push('&');
                        out.push_str(&encode(rule.field.as_deref().unwrap_or(field)));
                        out.push_str(rule.operator.as_deref().unwrap_or("="));
                    }
                    None => {
                        out.push('&');
                        out.push_str(field);
                        out.push('=');
                    }
                }
                out.push_str(&quoted_value(value));
            }
            None => {
                out.push('&');
                out.push_str(field);
                out.push('=');
                out.push_str(&plain_value(value));
            }
        }
    }
    out
}

fn scalar_value(s: &Scalar) -> String {
    match s {
        Scalar::String(text) if is_preformed(text) => encode(text),
        Scalar::String(text) => format!("\"{}\"", encode(text)),
        other => other.to_string(),
    }
}

/// Encoding when the resource has a search table: list elements are quoted.
fn quoted_value(value: &Leaf) -> String {
    match value {
        Leaf::List(items) => {
            let parts: Vec<String> = items.iter().map(|v| encode(&v.element_text())).collect();
            format!("(\"{}\")", parts.join("\",\""))
        }
        Leaf::Scalar(s) => scalar_value(s),
    }
}

/// Encoding when the resource has no search table: list elements are bare.
fn plain_value(value: &Leaf) -> String {
    match value {
        Leaf::List(items) => {
            let parts: Vec<String> = items.iter().map(|v| encode(&v.element_text())).collect();
            format!("({})", parts.join(","))
        }
        Leaf::Scalar(s) => scalar_value(s),
    }
}

/// Reference-list terms: caller filter with no option or operator handling, then the target term.
pub fn reference_terms(filter: &FilterTree, target: &str, id: &Leaf) -> String {
    let mut out = String::new();
    for (field, value) in flatten(filter).iter() {
        if value.is_null() {
            continue;
        }
        out.push_str(&format!("&{}={}", field, reference_value(value)));
    }
    out.push_str(&format!("&{}={}", target, reference_value(id)));
    out
}

fn reference_value(value: &Leaf) -> String {
    match value {
        Leaf::List(items) => {
            let parts: Vec<String> = items.iter().map(Scalar::element_text).collect();
            format!("({})", parts.join(","))
        }
        Leaf::Scalar(s) => format!("\"{}\"", s),
    }
}

/// Sort term. An override that already carries a `-` is a fixed direction and is sent verbatim.
pub fn sort_term(sort: &Sort, entry: Option<&ResourceOverride>) -> String {
    let sign = match sort.order {
        SortOrder::Desc => "-",
        SortOrder::Asc => "",
    };
    match entry.and_then(|e| e.sort_name(&sort.field)) {
        Some(name) if name.starts_with('-') => format!("&sort={}", name),
        Some(name) => format!("&sort={}{}", sign, name),
        None => format!("&sort={}{}", sign, sort.field),
    }
}

pub fn pagination_terms(pagination: &Pagination) -> String {
    format!("&offset={}&limit={}", pagination.offset(), pagination.per_page)
}

/// `id=(a,b,c)` lookup used to fetch several records at once.
pub fn id_list_term(ids: &[Scalar]) -> String {
    let parts: Vec<String> = ids.iter().map(Scalar::element_text).collect();
    format!("&id=({})", parts.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn tree(v: Value) -> FilterTree {
        serde_json::from_value(v).unwrap()
    }

    fn table(v: Value) -> HashMap<String, SearchRule> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn operator_override_applied() {
        let t = table(json!({"name": {"operator": "=~~"}}));
        assert_eq!(filter_terms(&tree(json!({"name": "bob"})), Some(&t)), "&name=~~\"bob\"");
    }

    #[test]
    fn field_rename_is_encoded() {
        let t = table(json!({"list": {"field": "items.name"}}));
        assert_eq!(filter_terms(&tree(json!({"list": "a b"})), Some(&t)), "&items.name=\"a%20b\"");
    }

    #[test]
    fn unlisted_field_in_table_uses_quoted_default() {
        let t = table(json!({"name": {"operator": "=~~"}}));
        let f = tree(json!({"status": "open", "count": 5, "active": true, "tags": ["a", "b"]}));
        assert_eq!(
            filter_terms(&f, Some(&t)),
            "&status=\"open\"&count=5&active=true&tags=(\"a\",\"b\")"
        );
    }

    #[test]
    fn no_table_uses_plain_lists() {
        let f = tree(json!({"status": "open", "count": 5, "tags": ["a", "b c"]}));
        assert_eq!(filter_terms(&f, None), "&status=\"open\"&count=5&tags=(a,b%20c)");
    }

    #[test]
    fn preformed_expression_encoded_whole() {
        let f = tree(json!({"id": "(1,2,3)"}));
        assert_eq!(filter_terms(&f, None), "&id=%281%2C2%2C3%29");
        assert_eq!(filter_terms(&f, Some(&HashMap::new())), "&id=%281%2C2%2C3%29");
    }

    #[test]
    fn nested_fields_flattened_and_nulls_skipped() {
        let f = tree(json!({"account": {"id": 5, "name": null}}));
        assert_eq!(filter_terms(&f, None), "&account.id=5");
    }

    #[test]
    fn option_list_emits_one_term_each() {
        let f = tree(json!({"option": ["x", "y"]}));
        assert_eq!(filter_terms(&f, None), "&option=x&option=y");
    }

    #[test]
    fn option_map_and_scalar() {
        assert_eq!(
            filter_terms(&tree(json!({"option": {"depth": 2, "mode": "fast"}, "a": 1})), None),
            "&option[depth]=2&option[mode]=fast&a=1"
        );
        assert_eq!(filter_terms(&tree(json!({"option": "count"})), None), "&option=count");
    }

    #[test]
    fn null_option_values_are_skipped() {
        assert_eq!(filter_terms(&tree(json!({"option": null, "status": null})), None), "");
        assert_eq!(filter_terms(&tree(json!({"option": ["x", null, "y"]})), None), "&option=x&option=y");
        assert_eq!(
            filter_terms(&tree(json!({"option": {"depth": null, "mode": "fast"}})), None),
            "&option[mode]=fast"
        );
    }

    #[test]
    fn nested_option_is_an_ordinary_field() {
        let f = tree(json!({"meta": {"option": "x"}}));
        assert_eq!(filter_terms(&f, None), "&meta.option=\"x\"");
    }

    #[test]
    fn reference_terms_quote_scalars_and_append_target() {
        let f = tree(json!({"status": "open", "kind": [1, 2]}));
        assert_eq!(
            reference_terms(&f, "thing_id", &Leaf::Scalar(7i64.into())),
            "&status=\"open\"&kind=(1,2)&thing_id=\"7\""
        );
        assert_eq!(
            reference_terms(&FilterTree::new(), "thing_id", &Leaf::List(vec![1i64.into(), 2i64.into()])),
            "&thing_id=(1,2)"
        );
    }

    #[test]
    fn sort_default_and_desc() {
        assert_eq!(sort_term(&Sort::asc("name"), None), "&sort=name");
        assert_eq!(sort_term(&Sort::desc("name"), None), "&sort=-name");
    }

    #[test]
    fn sort_override_with_fixed_direction() {
        let mut entry = ResourceOverride::default();
        entry.sort.insert("createdAt.value".into(), "-createdAt.value".into());
        entry.sort.insert("owner".into(), "owner.name".into());
        assert_eq!(sort_term(&Sort::desc("createdAt.value"), Some(&entry)), "&sort=-createdAt.value");
        assert_eq!(sort_term(&Sort::asc("createdAt.value"), Some(&entry)), "&sort=-createdAt.value");
        assert_eq!(sort_term(&Sort::desc("owner"), Some(&entry)), "&sort=-owner.name");
    }

    #[test]
    fn pagination_math() {
        assert_eq!(pagination_terms(&Pagination::new(3, 20)), "&offset=40&limit=20");
        assert_eq!(pagination_terms(&Pagination::new(1, 10)), "&offset=0&limit=10");
    }

    #[test]
    fn id_list() {
        assert_eq!(id_list_term(&[1i64.into(), "b".into()]), "&id=(1,b)");
    }
}
