//! Prompt assembly for the generative fallback: a fixed business preamble,
//! an optional context line from the visitor's conversation memory, and the
//! raw user message.

use streambot_core::ConversationMemory;

const SYSTEM_PREAMBLE: &str = "You are StreamBot, the helpful conversational sales assistant for \
    Streamplus Premium Hub. Streamplus sells affordable shared premium subscriptions: Canva Pro, \
    Netflix Premium, Spotify Premium, Disney+, and Amazon Prime. Focus on e-commerce style \
    replies: confirm product benefits, pricing, upsell bundles, outline payment options (GCash \
    0906-508-8846, BPI 1234-5678-90), and explain activation timelines. When users ask about \
    orders or upgrades, keep answers concise (2-4 sentences or up to 4 short bullet points) and \
    drive toward closing the sale. If exact pricing is unavailable, give a range and invite them \
    to message support. Contact info: 0906-508-8846, streamplushub@gmail.com, \
    www.streampluspremiun.com, Casillejos, Zambales.";

/// Ordered prompt segments for one fallback attempt. The context line is
/// omitted entirely when the memory is empty.
pub fn build_prompt(memory: &ConversationMemory, user_message: &str) -> Vec<String> {
    let mut parts = vec![SYSTEM_PREAMBLE.to_string()];

    let mut context = String::new();
    if let Some(intent) = memory.last_intent {
        context.push_str(&format!("Previously discussed intent: {}. ", intent.as_str()));
    }
    if let Some(product) = &memory.last_product {
        context.push_str(&format!("Previously discussed product: {product}. "));
    }
    if !context.is_empty() {
        parts.push(format!("Context: {context}"));
    }

    parts.push(format!("User: {user_message}"));
    parts.push("Assistant:".to_string());
    parts
}
