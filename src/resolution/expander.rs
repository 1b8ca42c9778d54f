//! Recursive expansion of raw values.
//!
//! Sequences and mappings are walked recursively; deferred markers are handed
//! to a resolver callback and literals pass through. All siblings at one
//! nesting level are expanded concurrently and every sibling is allowed to
//! settle before the parent decides whether it failed.

use std::future::Future;

use futures::future::{join_all, BoxFuture, FutureExt};
use serde_json::{Map, Value};

use super::value::RawValue;
use crate::error::ResolutionError;

/// Expand `value`, resolving each deferred marker through `resolve`.
///
/// Structure is preserved: sequences keep element positions and mappings keep
/// their keys in declaration order, regardless of the order in which lookups
/// complete. The value returned by `resolve` is used as-is; it is not
/// expanded again. When several siblings fail, the error of the first one in
/// declaration order is reported, unchanged.
///
/// # Example
///
/// ```
/// use easyenv::resolution::{expand, RawValue};
/// use easyenv::ResolutionError;
/// use serde_json::{json, Value};
///
/// let raw = RawValue::from(json!({"a": ["lit", "ssm:foo"], "b": 42}));
/// let resolve = |marker: String| async move {
///     Ok::<Value, ResolutionError>(json!(format!("<{}>", marker)))
/// };
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let expanded = runtime.block_on(expand(&raw, &resolve)).unwrap();
/// assert_eq!(expanded, json!({"a": ["lit", "<ssm:foo>"], "b": 42}));
/// ```
pub fn expand<'a, F, Fut>(
    value: &'a RawValue,
    resolve: &'a F,
) -> BoxFuture<'a, Result<Value, ResolutionError>>
where
    F: Fn(String) -> Fut + Sync,
    Fut: Future<Output = Result<Value, ResolutionError>> + Send + 'a,
{
    async move {
        match value {
            RawValue::Sequence(items) => {
                let settled = join_all(items.iter().map(|item| expand(item, resolve))).await;
                settled
                    .into_iter()
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            RawValue::Mapping(entries) => {
                let settled =
                    join_all(entries.iter().map(|(_, item)| expand(item, resolve))).await;
                let mut expanded = Map::with_capacity(entries.len());
                for ((key, _), result) in entries.iter().zip(settled) {
                    expanded.insert(key.clone(), result?);
                }
                Ok(Value::Object(expanded))
            }
            RawValue::Marker(marker) => resolve(marker.clone()).await,
            RawValue::Literal(literal) => Ok(literal.clone()),
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn table(entries: &[(&str, Value)]) -> Arc<HashMap<String, Value>> {
        Arc::new(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn lookup(
        table: Arc<HashMap<String, Value>>,
    ) -> impl Fn(String) -> BoxFuture<'static, Result<Value, ResolutionError>> + Sync {
        move |marker: String| {
            let table = Arc::clone(&table);
            async move {
                table
                    .get(&marker)
                    .cloned()
                    .ok_or(ResolutionError::UpstreamLookupFailure {
                        source_spec: marker,
                        message: "not found".into(),
                    })
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn expands_nested_structure() {
        let raw = RawValue::from(json!({"a": ["lit", "ssm:foo"], "b": 42}));
        let resolve = lookup(table(&[("ssm:foo", json!("resolved-value"))]));

        let expanded = expand(&raw, &resolve).await.unwrap();
        assert_eq!(expanded, json!({"a": ["lit", "resolved-value"], "b": 42}));
    }

    #[tokio::test]
    async fn literals_pass_through_untouched() {
        let resolve = lookup(table(&[]));
        for literal in [json!("plain"), json!(3.5), json!(false), Value::Null] {
            let raw = RawValue::from(literal.clone());
            assert_eq!(expand(&raw, &resolve).await.unwrap(), literal);
        }
    }

    #[tokio::test]
    async fn resolver_result_is_not_expanded_again() {
        let raw = RawValue::from(json!("ssm:outer"));
        let resolve = lookup(table(&[("ssm:outer", json!(["ssm:inner"]))]));

        assert_eq!(expand(&raw, &resolve).await.unwrap(), json!(["ssm:inner"]));
    }

    #[tokio::test]
    async fn mapping_keeps_key_order() {
        let raw = RawValue::from(json!({"z": "ssm:z", "a": "ssm:a", "m": 1}));
        let resolve = lookup(table(&[("ssm:z", json!("Z")), ("ssm:a", json!("A"))]));

        let expanded = expand(&raw, &resolve).await.unwrap();
        let keys: Vec<_> = expanded.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[tokio::test(start_paused = true)]
    async fn preserves_positions_when_completion_order_differs() {
        let raw = RawValue::from(json!(["slow:1", "fast:2", "mid:3"]));
        let completed = Arc::new(Mutex::new(Vec::new()));
        let resolve = {
            let completed = Arc::clone(&completed);
            move |marker: String| {
                let completed = Arc::clone(&completed);
                async move {
                    let delay = match marker.split(':').next() {
                        Some("slow") => 30,
                        Some("mid") => 20,
                        _ => 10,
                    };
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    completed.lock().unwrap().push(marker.clone());
                    Ok::<_, ResolutionError>(json!(marker))
                }
            }
        };

        let expanded = expand(&raw, &resolve).await.unwrap();
        assert_eq!(expanded, json!(["slow:1", "fast:2", "mid:3"]));
        assert_eq!(
            *completed.lock().unwrap(),
            vec!["fast:2", "mid:3", "slow:1"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn siblings_run_concurrently() {
        let raw = RawValue::from(json!(["a:1", "a:2", "a:3", "a:4"]));
        let resolve = |marker: String| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, ResolutionError>(json!(marker))
        };

        let started = tokio::time::Instant::now();
        expand(&raw, &resolve).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn failing_sibling_lets_others_settle() {
        let raw = RawValue::from(json!(["ok:1", "bad:2", "ok:3"]));
        let calls = Arc::new(AtomicUsize::new(0));
        let resolve = {
            let calls = Arc::clone(&calls);
            move |marker: String| {
                let calls = Arc::clone(&calls);
                async move {
                    tokio::task::yield_now().await;
                    calls.fetch_add(1, Ordering::SeqCst);
                    if marker.starts_with("bad") {
                        Err(ResolutionError::UpstreamLookupFailure {
                            source_spec: marker,
                            message: "denied".into(),
                        })
                    } else {
                        Ok(json!(marker))
                    }
                }
            }
        };

        let err = expand(&raw, &resolve).await.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            err,
            ResolutionError::UpstreamLookupFailure {
                source_spec: "bad:2".into(),
                message: "denied".into(),
            }
        );
    }

    #[tokio::test]
    async fn first_failure_in_declaration_order_is_reported() {
        let raw = RawValue::from(json!({"first": "bad:1", "second": "bad:2"}));
        let resolve = lookup(table(&[]));

        let err = expand(&raw, &resolve).await.unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::UpstreamLookupFailure { ref source_spec, .. } if source_spec == "bad:1"
        ));
    }

    #[tokio::test]
    async fn empty_containers_expand_to_empty() {
        let resolve = lookup(table(&[]));
        assert_eq!(
            expand(&RawValue::from(json!([])), &resolve).await.unwrap(),
            json!([])
        );
        assert_eq!(
            expand(&RawValue::from(json!({})), &resolve).await.unwrap(),
            json!({})
        );
    }
}
