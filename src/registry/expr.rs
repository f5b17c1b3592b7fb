use crate::error::ApplyError;
use crate::spec::KeyPath;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// A parsed leaf expression: `name` or `name(<json literal>)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafExpr {
    pub name: String,
    pub param: Option<Value>,
}

// Capture:
// 1) name: identifier
// 2) param: everything between the outer parens (optional)
static LEAF_EXPR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\((.*)\))?\s*$"#)
        .expect("leaf expression pattern is a valid regex")
});

/// Parse a leaf expression found in a spec document.
///
/// Accepted forms:
/// identity
/// add(1)
/// get("host")
/// pointer("/db/url")
pub fn parse_leaf_expr(path: &KeyPath, expr: &str) -> Result<LeafExpr, ApplyError> {
    let bad = |reason: String| ApplyError::BadExpression {
        path: path.clone(),
        expr: expr.to_string(),
        reason,
    };

    let caps = LEAF_EXPR_RE
        .captures(expr)
        .ok_or_else(|| bad("expected `name` or `name(<json>)`".to_string()))?;

    let name = caps
        .get(1)
        .ok_or_else(|| bad("missing function name".to_string()))?
        .as_str()
        .to_string();

    let param = match caps.get(2) {
        None => None,
        Some(m) if m.as_str().trim().is_empty() => None,
        Some(m) => {
            let v: Value = serde_json::from_str(m.as_str())
                .map_err(|e| bad(format!("parameter is not a JSON literal: {e}")))?;
            Some(v)
        }
    };

    Ok(LeafExpr { name, param })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(expr: &str) -> Result<LeafExpr, ApplyError> {
        parse_leaf_expr(&KeyPath::parse("x"), expr)
    }

    #[test]
    fn bare_name() {
        let e = parse("  identity ").unwrap();
        assert_eq!(
            e,
            LeafExpr {
                name: "identity".into(),
                param: None
            }
        );
    }

    #[test]
    fn name_with_params() {
        assert_eq!(parse("add(1)").unwrap().param, Some(json!(1)));
        assert_eq!(parse("get(\"host\")").unwrap().param, Some(json!("host")));
        assert_eq!(parse("const([1, 2])").unwrap().param, Some(json!([1, 2])));
        assert_eq!(parse("count()").unwrap().param, None);
    }

    #[test]
    fn parses_from_many_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || parse(&format!("add({i})")).unwrap().param))
            .collect();
        let params: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            params,
            vec![Some(json!(0)), Some(json!(1)), Some(json!(2)), Some(json!(3))]
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse("1abc"),
            Err(ApplyError::BadExpression { .. })
        ));
        assert!(matches!(
            parse("add(one)"),
            Err(ApplyError::BadExpression { .. })
        ));
        assert!(matches!(
            parse("add(1"),
            Err(ApplyError::BadExpression { .. })
        ));
    }
}
