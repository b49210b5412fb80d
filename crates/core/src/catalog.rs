use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// One sellable subscription. Loaded once at startup, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Lowercase alias strings matched by substring containment.
    pub aliases: Vec<String>,
    /// Whole currency units, no decimals.
    pub price: i64,
    pub billing: String,
    pub perks: String,
}

#[derive(Clone, Debug)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// First product (in catalog order) with any alias contained in the
    /// lowercased message. Substring containment only: no word boundaries,
    /// no ranking by specificity.
    pub fn match_product(&self, message: &str) -> Option<&Product> {
        let text = message.to_lowercase();
        self.products
            .iter()
            .find(|product| product.aliases.iter().any(|alias| text.contains(alias.as_str())))
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new(vec![
            product(
                "canva-pro",
                "Canva Pro",
                &["canva", "canva pro"],
                249,
                "per seat / month",
                "Includes full template library, brand kits, and team collaboration.",
            ),
            product(
                "netflix-premium",
                "Netflix Premium",
                &["netflix", "netflix premium"],
                499,
                "per account / month",
                "Supports up to 4K UHD streaming with multiple profiles.",
            ),
            product(
                "spotify-premium",
                "Spotify Premium",
                &["spotify", "spotify premium"],
                189,
                "per account / month",
                "Ad-free listening, offline downloads, and high fidelity audio.",
            ),
            product(
                "disney-plus",
                "Disney+",
                &["disney", "disney+", "disney plus"],
                299,
                "per account / month",
                "Access to Disney, Pixar, Marvel, Star Wars, and National Geographic.",
            ),
            product(
                "amazon-prime",
                "Amazon Prime Video",
                &["amazon", "prime", "prime video", "amazon prime"],
                179,
                "per account / month",
                "Movies, series, and originals with multi-device streaming.",
            ),
        ])
    }
}

fn product(
    id: &str,
    name: &str,
    aliases: &[&str],
    price: i64,
    billing: &str,
    perks: &str,
) -> Product {
    Product {
        id: ProductId(id.to_string()),
        name: name.to_string(),
        aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        price,
        billing: billing.to_string(),
        perks: perks.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::ProductCatalog;

    #[test]
    fn matches_alias_case_insensitively() {
        let catalog = ProductCatalog::default();
        let matched = catalog.match_product("How much is NETFLIX these days?");
        assert_eq!(matched.map(|product| product.name.as_str()), Some("Netflix Premium"));
    }

    #[test]
    fn matches_alias_as_bare_substring() {
        let catalog = ProductCatalog::default();
        // "prime" occurs inside "primetime"; substring semantics are intentional.
        let matched = catalog.match_product("is primetime included?");
        assert_eq!(matched.map(|product| product.id.0.as_str()), Some("amazon-prime"));
    }

    #[test]
    fn first_catalog_entry_wins_on_cross_product_collision() {
        let catalog = ProductCatalog::default();
        let matched = catalog.match_product("canva or spotify, which is cheaper?");
        assert_eq!(matched.map(|product| product.id.0.as_str()), Some("canva-pro"));
    }

    #[test]
    fn no_match_for_unknown_products() {
        let catalog = ProductCatalog::default();
        assert!(catalog.match_product("do you sell youtube premium?").is_none());
    }

    #[test]
    fn catalog_carries_the_five_streamplus_products() {
        let catalog = ProductCatalog::default();
        assert_eq!(catalog.products().len(), 5);
        assert!(catalog.products().iter().all(|product| product.price > 0));
    }
}
