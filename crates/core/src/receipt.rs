//! User-facing rendering of completed orders: currency amounts, the virtual
//! receipt, and the recent-order summary.

use crate::order::Order;

const RECEIPT_DATE_FORMAT: &str = "%d %b %Y %I:%M %p";
const RECENT_ORDER_LIMIT: usize = 3;

/// Peso glyph with thousands separators and zero decimal places.
pub fn format_currency(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0 { "-" } else { "" };
    format!("\u{20b1}{sign}{grouped}")
}

pub fn format_receipt(order: &Order) -> String {
    let lines = [
        "\u{1f9fe} Streamplus Virtual Receipt".to_string(),
        format!("Receipt ID: {}", order.order_id),
        format!("Date: {}", order.created_at.format(RECEIPT_DATE_FORMAT)),
        format!("Customer: {}", order.customer_name),
        format!("Email: {}", order.customer_email),
        String::new(),
        "Order Summary:".to_string(),
        format!(
            "- {} \u{d7} {} ({}) \u{2014} {}",
            order.quantity,
            order.product_name,
            order.billing,
            format_currency(order.unit_price)
        ),
        format!("Subtotal: {}", format_currency(order.subtotal)),
        format!("Platform Fee: {}", format_currency(order.platform_fee)),
        format!("Total Due: {}", format_currency(order.total)),
        String::new(),
        "Payment Options:".to_string(),
        "- GCash: 0906-508-8846 (Streamplus Premium Hub)".to_string(),
        "- BPI: 1234-5678-90 (Streamplus Trading)".to_string(),
        String::new(),
        "We'll activate your access within 5-10 minutes after payment confirmation. \
         Send your proof of payment via Messenger or email to streamplushub@gmail.com."
            .to_string(),
    ];
    lines.join("\n")
}

/// Up to the three most recent orders, newest first.
pub fn summarize_orders(orders: &[Order]) -> String {
    let mut lines = vec!["Here are your recent Streamplus orders:".to_string()];
    for order in orders.iter().rev().take(RECENT_ORDER_LIMIT) {
        lines.push(format!(
            "- {} \u{2022} {} \u{d7} {} \u{2022} {} \u{2022} {}",
            order.order_id,
            order.product_name,
            order.quantity,
            format_currency(order.total),
            order.created_at.format(RECEIPT_DATE_FORMAT)
        ));
    }
    lines.push("Reply with a product name if you'd like to start a new order.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_receipt, summarize_orders};
    use crate::catalog::ProductCatalog;
    use crate::order::{Order, PendingOrder};

    fn order_fixture(alias: &str, quantity: u32) -> Order {
        let product = ProductCatalog::default()
            .match_product(alias)
            .expect("catalog fixture should match alias")
            .clone();
        Order::finalize(
            &PendingOrder { product, quantity },
            "Juan Dela Cruz".to_string(),
            "juan@email.com".to_string(),
        )
    }

    #[test]
    fn currency_uses_peso_glyph_and_thousands_separators() {
        assert_eq!(format_currency(0), "\u{20b1}0");
        assert_eq!(format_currency(998), "\u{20b1}998");
        assert_eq!(format_currency(1_018), "\u{20b1}1,018");
        assert_eq!(format_currency(1_234_567), "\u{20b1}1,234,567");
    }

    #[test]
    fn receipt_contains_id_product_and_total() {
        let order = order_fixture("netflix", 2);
        let receipt = format_receipt(&order);

        assert!(receipt.contains(&order.order_id));
        assert!(receipt.contains("Netflix Premium"));
        assert!(receipt.contains("Total Due: \u{20b1}1,018"));
        assert!(receipt.contains("Customer: Juan Dela Cruz"));
        assert!(receipt.contains("Payment Options:"));
    }

    #[test]
    fn summary_lists_three_most_recent_newest_first() {
        let orders = vec![
            order_fixture("canva", 1),
            order_fixture("spotify", 1),
            order_fixture("disney", 1),
            order_fixture("netflix", 1),
        ];
        let summary = summarize_orders(&orders);

        assert!(!summary.contains("Canva Pro"));
        let netflix = summary.find("Netflix Premium").expect("newest order should be listed");
        let disney = summary.find("Disney+").expect("second newest order should be listed");
        let spotify = summary.find("Spotify Premium").expect("third newest order should be listed");
        assert!(netflix < disney && disney < spotify);
    }
}
