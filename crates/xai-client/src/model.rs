/// Model id used when the configured id is absent or unknown.
pub const DEFAULT_MODEL_ID: &str = "grok-2-latest";

/// Catalog metadata for a known model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelInfo {
    /// Maximum output tokens per completion.
    pub max_tokens: u32,
    /// Combined prompt plus completion window.
    pub context_window: u32,
    /// Whether the model accepts image input.
    pub supports_images: bool,
    /// USD per million input tokens.
    pub input_price: f64,
    /// USD per million output tokens.
    pub output_price: f64,
}

/// A resolved model id plus its catalog metadata.
///
/// Resolved once at the start of a call and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSelection {
    pub id: String,
    pub info: ModelInfo,
}

const GROK_2: ModelInfo = ModelInfo {
    max_tokens: 8192,
    context_window: 131_072,
    supports_images: false,
    input_price: 2.0,
    output_price: 10.0,
};

const GROK_2_VISION: ModelInfo = ModelInfo {
    max_tokens: 8192,
    context_window: 32_768,
    supports_images: true,
    input_price: 2.0,
    output_price: 10.0,
};

const GROK_BETA: ModelInfo = ModelInfo {
    max_tokens: 8192,
    context_window: 131_072,
    supports_images: false,
    input_price: 5.0,
    output_price: 15.0,
};

const GROK_VISION_BETA: ModelInfo = ModelInfo {
    max_tokens: 8192,
    context_window: 8192,
    supports_images: true,
    input_price: 5.0,
    output_price: 15.0,
};

/// Returns catalog metadata for a known model id.
pub fn model_info(id: &str) -> Option<ModelInfo> {
    match id {
        "grok-2-latest" | "grok-2-1212" => Some(GROK_2),
        "grok-2-vision-latest" | "grok-2-vision-1212" => Some(GROK_2_VISION),
        "grok-beta" => Some(GROK_BETA),
        "grok-vision-beta" => Some(GROK_VISION_BETA),
        _ => None,
    }
}

/// Resolves the requested model id against the known-model catalog.
///
/// Pure and deterministic: a known id resolves to itself, anything else
/// (including `None`) resolves to [`DEFAULT_MODEL_ID`].
pub fn resolve_model(requested: Option<&str>) -> ModelSelection {
    if let Some(id) = requested
        && let Some(info) = model_info(id)
    {
        return ModelSelection {
            id: id.to_string(),
            info,
        };
    }
    ModelSelection {
        id: DEFAULT_MODEL_ID.to_string(),
        info: GROK_2,
    }
}
