use serde_json::Value;

/// Records a user action on the `audit` tracing target.
pub fn log_audit(user: Option<&str>, action: &str, resource: Option<&str>, metadata: Option<Value>) {
    let metadata = metadata.unwrap_or(Value::Null);
    tracing::info!(
        target: "audit",
        user = user.unwrap_or("-"),
        action,
        resource = resource.unwrap_or("-"),
        metadata = %metadata,
        "audit"
    );
}
