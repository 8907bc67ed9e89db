/*
 * Responsibility
 * - usuario.historial (JSONB 配列) に購入を追加するときのルール
 *   - 直前の購入と total が同じで fecha の差が 2 秒未満なら重複として無視
 *   - 最新 10 件だけ保持
 * - DB には触らない (repo で読み書きした配列をここで加工する)
 */
use chrono::{DateTime, Utc};
use serde_json::Value;

pub const HISTORY_LIMIT: usize = 10;
const DUPLICATE_WINDOW_MS: i64 = 2_000;

#[derive(Debug, PartialEq)]
pub enum AppendOutcome {
    Added(Vec<Value>),
    /// Same purchase submitted twice in a row; carries the `numeroCompra` of the kept one.
    Duplicate { numero_compra: Value },
}

pub fn append(history: &[Value], purchase: Value, now: DateTime<Utc>) -> AppendOutcome {
    if let Some(last) = history.last()
        && !purchase.is_null()
        && is_duplicate(last, &purchase, now)
    {
        let numero_compra = match last.get("numeroCompra") {
            Some(v) if is_truthy(v) => v.clone(),
            _ => Value::Null,
        };
        return AppendOutcome::Duplicate { numero_compra };
    }

    let skip = (history.len() + 1).saturating_sub(HISTORY_LIMIT);
    let updated = history
        .iter()
        .cloned()
        .chain(std::iter::once(purchase))
        .skip(skip)
        .collect();

    AppendOutcome::Added(updated)
}

fn is_duplicate(last: &Value, purchase: &Value, now: DateTime<Utc>) -> bool {
    if !same_total(last.get("total"), purchase.get("total")) {
        return false;
    }

    // A previous purchase without a date counts as the epoch; a new one without a date as now.
    let last_ms = match last.get("fecha").filter(|v| is_truthy(v)) {
        Some(v) => parse_millis(v),
        None => Some(0),
    };
    let new_ms = match purchase.get("fecha").filter(|v| is_truthy(v)) {
        Some(v) => parse_millis(v),
        None => Some(now.timestamp_millis()),
    };

    match (last_ms, new_ms) {
        (Some(a), Some(b)) => (b - a).abs() < DUPLICATE_WINDOW_MS,
        _ => false,
    }
}

fn same_total(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn parse_millis(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_f64().map(|ms| ms as i64),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.timestamp_millis()),
        _ => None,
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}
