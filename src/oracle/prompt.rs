use serde::Serialize;

use crate::extractor::ProductRaw;

/// Near-zero sampling so identical products get (nearly) identical verdicts.
pub const TEMPERATURE: f32 = 0.1;

/// Sent verbatim on every call. `material_score` is requested on the same
/// 0-35 scale the scorer caps it at.
pub const SYSTEM_INSTRUCTION: &str = "\
You are an expert environmental impact scoring assistant that is very strict. \
Given a product description, output a JSON object with:

- detected_materials: list of materials found in the product
- material_score: number from 0-35 reflecting how sustainable the detected materials are \
(35 = very eco-friendly, 0 = very harmful, be strict)
- sustain_certs: list of sustainability organization certifications offered \
(i.e climate pledge, cradle to cradle, etc.)
- shipping_weight_category: \"light\" | \"medium\" | \"heavy\" \
(if you do not know, make an educated guess based on the product)
- eco_friendly_keywords: list of eco-friendly terms found (terms MUST be related to environment)
- eco_warnings: list of potentially harmful terms or materials found \
(doesn't have to be explicitly harmful, just questionable is enough)
- estimated_score: number from 0-100 (100 = most eco-friendly, be VERY strict on scoring, \
factor in product's historical environmental context)
- explanation: short string summary of the environmental impact, talk about positives and \
environmental concerns

Respond only with valid JSON, no additional text.";

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

pub fn user_message(product: &ProductRaw) -> String {
    format!("Analyze this product: {}", product.summary())
}

pub fn chat_request<'a>(model: &'a str, user_content: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: SYSTEM_INSTRUCTION,
            },
            ChatMessage {
                role: "user",
                content: user_content,
            },
        ],
        temperature: TEMPERATURE,
    }
}
