/// Catalog record. The identifier is supplied by the storefront, not
/// generated here. A `Product` is created lazily the first time an identifier
/// is seen together with a name; the stored name is never overwritten by
/// later views.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl Product {
    pub fn new<T: Into<String>>(id: T, name: T) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }
}
