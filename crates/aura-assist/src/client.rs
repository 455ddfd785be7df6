//! Bedrock Converse client for chat replies and evidence image analysis.
//!
//! Nothing here is trusted to succeed: callers always have a deterministic
//! fallback from [`crate::respond`] ready, and treat every error (including
//! an empty reply) as a reason to use it.

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ImageBlock, ImageFormat, ImageSource, Message,
    SystemContentBlock,
};
use tracing::info;

use crate::error::AssistError;

pub const CHAT_SYSTEM_PROMPT: &str = "\
You are Aura, a clinical assistant embedded in a hospital patient registry. \
Answer the clinician's question using only the patient record provided. \
Be concise and factual. If the record does not contain the answer, say so.";

pub const IMAGE_SYSTEM_PROMPT: &str = "\
You review clinical images attached to a patient record. \
Describe the visible findings in two or three sentences for a clinician. \
Do not make a definitive diagnosis.";

/// Handle to the generative model. Cheap to clone.
#[derive(Clone)]
pub struct Assistant {
    client: Client,
    model_id: String,
}

impl Assistant {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// Build a client from the default credential chain for `region`.
    pub async fn from_env(region: &str, model_id: impl Into<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&config), model_id)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Single-turn text completion.
    pub async fn reply(&self, system_prompt: &str, message: &str) -> Result<String, AssistError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(message.to_string()))
            .build()
            .map_err(|e| AssistError::Invocation(e.to_string()))?;

        self.converse(system_prompt, message).await
    }

    /// Describe an image. `media_type` must be one of the formats Bedrock
    /// accepts (png, jpeg, gif, webp).
    pub async fn describe_image(
        &self,
        bytes: &[u8],
        media_type: &str,
        prompt: &str,
    ) -> Result<String, AssistError> {
        let format = image_format_for_media_type(media_type)
            .ok_or_else(|| AssistError::UnsupportedImage(media_type.to_string()))?;

        let image = ImageBlock::builder()
            .format(format)
            .source(ImageSource::Bytes(aws_smithy_types::Blob::new(bytes)))
            .build()
            .map_err(|e| AssistError::Invocation(e.to_string()))?;

        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Image(image))
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| AssistError::Invocation(e.to_string()))?;

        info!(model_id = %self.model_id, media_type, size = bytes.len(), "analyzing image");
        self.converse(IMAGE_SYSTEM_PROMPT, message).await
    }

    async fn converse(&self, system_prompt: &str, message: Message) -> Result<String, AssistError> {
        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(system_prompt.to_string()))
            .messages(message)
            .send()
            .await
            .map_err(|e| AssistError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| AssistError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let text = text.trim();
        if text.is_empty() {
            return Err(AssistError::ResponseParse("empty response".to_string()));
        }
        Ok(text.to_string())
    }
}

/// Map an image media type to a Bedrock `ImageFormat`.
pub fn image_format_for_media_type(media_type: &str) -> Option<ImageFormat> {
    let essence = media_type.split(';').next().unwrap_or("").trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/gif" => Some(ImageFormat::Gif),
        "image/webp" => Some(ImageFormat::Webp),
        _ => None,
    }
}
