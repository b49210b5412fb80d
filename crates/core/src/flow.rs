//! Order conversation state machine. Each message is evaluated against an
//! ordered rule list; the first matching rule produces the reply. A `None`
//! return means no deterministic match and the caller falls through to the
//! generative path.

use tracing::info;

use crate::catalog::ProductCatalog;
use crate::extract::{extract_quantity, parse_contact_details};
use crate::order::{Intent, Order, PendingOrder};
use crate::receipt::{format_currency, format_receipt, summarize_orders};
use crate::session::VisitorSession;

const ORDER_KEYWORDS: [&str; 6] = ["order", "buy", "purchase", "subscribe", "get", "reserve"];
const CANCEL_KEYWORDS: [&str; 4] = ["cancel", "nevermind", "never mind", "stop"];

const FALLBACK_CUSTOMER_NAME: &str = "Valued Customer";

#[derive(Clone, Debug, Default)]
pub struct OrderFlow {
    catalog: ProductCatalog,
}

impl OrderFlow {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Runs the message through the rule list, mutating the session where a
    /// rule fires. Returns the deterministic reply, or `None` when nothing
    /// matched.
    pub fn respond(&self, message: &str, session: &mut VisitorSession) -> Option<String> {
        let text = message.to_lowercase();

        if text.contains("receipt") {
            return Some(self.latest_receipt(session));
        }

        if text.contains("orders") || text.contains("history") || text.contains("summary") {
            return Some(self.order_summary(session));
        }

        if session.pending.is_some()
            && CANCEL_KEYWORDS.iter().any(|keyword| text.contains(keyword))
        {
            session.pending = None;
            return Some(
                "No problem -- I cleared the pending order. Let me know if you'd like to try again."
                    .to_string(),
            );
        }

        if session.pending.is_some() {
            return Some(self.collect_details(message, session));
        }

        let product = self.catalog.match_product(message)?.clone();
        session.memory.last_product = Some(product.name.clone());
        session.memory.last_intent = Some(Intent::ProductInfo);

        if ORDER_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
            let quantity = extract_quantity(message);
            let total = product.price * i64::from(quantity);
            let reply = format!(
                "Awesome choice! I reserved {quantity} \u{d7} {} ({}). That's {} each, total {}. \
                 Please share the account name and email for the receipt \
                 (example: Juan Dela Cruz - juan@email.com).",
                product.name,
                product.billing,
                format_currency(product.price),
                format_currency(total)
            );
            session.pending = Some(PendingOrder { product, quantity });
            session.memory.last_intent = Some(Intent::Order);
            return Some(reply);
        }

        Some(format!(
            "{} costs {} {}. {} Reply with \"order\" plus the product name if you'd like me to \
             reserve it for you.",
            product.name,
            format_currency(product.price),
            product.billing,
            product.perks
        ))
    }

    fn latest_receipt(&self, session: &VisitorSession) -> String {
        match session.orders.last() {
            Some(order) => {
                format!("Here's your latest receipt:\n\n{}", format_receipt(order))
            }
            None => "I don't see a completed order yet. Tell me which product you'd like to buy \
                     and I'll prepare a receipt for you."
                .to_string(),
        }
    }

    fn order_summary(&self, session: &VisitorSession) -> String {
        if session.orders.is_empty() {
            return "No orders on file yet. Ask for a product and say \"order\" to get started."
                .to_string();
        }
        summarize_orders(&session.orders)
    }

    /// Awaiting-details rule: either re-prompt for contact info or finalize
    /// the pending order into the history.
    fn collect_details(&self, message: &str, session: &mut VisitorSession) -> String {
        let Some(details) = parse_contact_details(message) else {
            return "Almost done! Please share the name and email for the receipt in one message. \
                    Example: Juan Dela Cruz - juandelacruz@email.com"
                .to_string();
        };

        // The pending slot is only cleared here and in the cancel rule, so
        // it is still occupied when this rule runs.
        let Some(pending) = session.pending.take() else {
            return self.latest_receipt(session);
        };

        let customer_name =
            details.name.unwrap_or_else(|| FALLBACK_CUSTOMER_NAME.to_string());
        let order = Order::finalize(&pending, customer_name, details.email);

        info!(
            event_name = "flow.order.completed",
            order_id = %order.order_id,
            product_id = %order.product_id.0,
            quantity = order.quantity,
            total = order.total,
            "order finalized"
        );

        session.memory.last_intent = Some(Intent::Order);
        session.memory.last_product = Some(order.product_name.clone());
        let receipt = format_receipt(&order);
        let reply = format!(
            "Thanks, {}! Your {} order is confirmed. I've sent the virtual receipt below.\n\n{}",
            order.customer_name, order.product_name, receipt
        );
        session.orders.push(order);
        reply
    }
}
