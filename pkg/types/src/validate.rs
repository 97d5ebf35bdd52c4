use anyhow::{Result, bail};

/// Validate a Kubernetes-style object or namespace name (DNS-1123 label).
/// Rules: lowercase `[a-z0-9-]`, max 63 chars, no leading/trailing hyphens.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("name must not be empty");
    }
    if name.len() > 63 {
        bail!("name '{}' exceeds 63 characters (got {})", name, name.len());
    }
    if name.starts_with('-') || name.ends_with('-') {
        bail!("name '{}' must not start or end with a hyphen", name);
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        bail!(
            "name '{}' contains '{}'; only lowercase letters, digits, and hyphens are allowed",
            name,
            c
        );
    }
    Ok(())
}

/// Validate the namespace and name of an object about to be stored.
pub fn validate_object(kind: &str, namespace: &str, name: &str) -> Result<()> {
    validate_name(namespace).map_err(|e| anyhow::anyhow!("invalid {} namespace: {}", kind, e))?;
    validate_name(name).map_err(|e| anyhow::anyhow!("invalid {} name: {}", kind, e))?;
    Ok(())
}
