/// Syntactic check on an email address: a single `@` separating a non-empty
/// local part from a domain that contains a dot, and no whitespace anywhere.
/// Deliverability is the SMS/email provider's problem, not ours.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let local = match parts.next() {
        Some(local) => local,
        None => return false,
    };
    let domain = match parts.next() {
        Some(domain) => domain,
        None => return false,
    };
    if parts.next().is_some() {
        return false;
    }
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
