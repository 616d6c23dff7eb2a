use crate::shared::entity::ID;
use url::Url;

/// Builds the checkout recovery link a reminder points at, embedding the
/// user and the distinct products the reminder refers to.
pub fn checkout_link(base_url: &str, user_id: &ID, product_ids: &[String]) -> anyhow::Result<String> {
    let mut url = Url::parse(base_url)?;
    url.query_pairs_mut()
        .append_pair("user", &user_id.as_string())
        .append_pair("products", &product_ids.join(","));
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_user_and_products() {
        let user_id = ID::new();
        let product_ids = vec!["p1".to_string(), "p2".to_string()];
        let link = checkout_link("http://localhost:3000/checkout", &user_id, &product_ids)
            .expect("Valid link");

        assert!(link.starts_with("http://localhost:3000/checkout?"));
        assert!(link.contains(&format!("user={}", user_id)));
        assert!(link.contains("products=p1%2Cp2"));
    }

    #[test]
    fn rejects_invalid_base_urls() {
        let user_id = ID::new();
        assert!(checkout_link("not a url", &user_id, &[]).is_err());
    }
}
