//! Prompt assembly for the text-to-image proxy.
//!
//! The client picks a style, background, and mood by keyword; each keyword
//! expands to a fixed descriptive phrase. Unknown keywords fall back to
//! `anime`, `sky`, and `natural` respectively.

/// Negative prompt sent with every image generation request.
pub const NEGATIVE_PROMPT: &str = "lowres, bad anatomy, bad hands, text, error, missing fingers, \
    extra digit, fewer digits, cropped, worst quality, low quality, normal quality, \
    jpeg artifacts, signature, watermark, username, blurry, disfigured, extra limbs, \
    missing limbs, deformed hands, long neck, poorly drawn face, mutated, bad proportions, \
    low resolution, distorted";

fn style_phrase(style: &str) -> &'static str {
    match style {
        "realistic" => "photorealistic, ultra-detailed, realistic skin texture, sharp lighting",
        "retro" => "retro illustration, 90s style, warm tones, nostalgic mood",
        "cyberpunk" => "cyberpunk style, neon lights, futuristic city, glowing elements",
        _ => "anime style, vibrant, expressive eyes, detailed hair",
    }
}

fn background_phrase(background: &str) -> &'static str {
    match background {
        "beach" => "sunny beach with waves, soft sand, blue ocean, gentle breeze",
        "forest" => "lush green forest with sunlight filtering through leaves, peaceful nature",
        "castle" => "majestic fantasy castle, intricate details, magical atmosphere",
        "classroom" => "bright modern classroom with desks, blackboard, natural light",
        "stage" => "concert stage with spotlight, dynamic lighting, crowd in background",
        "hallway" => "school hallway with lockers, clean floor, ambient light",
        "cafe" => "cozy cafe interior, warm lighting, wooden furniture, relaxed vibe",
        _ => "clear blue sky with scattered clouds, bright daylight",
    }
}

fn mood_phrase(mood: &str) -> &'static str {
    match mood {
        "neon" => "neon lighting, glowing highlights, vibrant colors",
        "cool" => "cool lighting, bluish tones, soft ambient shadows",
        "rainbow" => "rainbow lighting, colorful reflections, dreamy glow",
        _ => "natural daylight, soft shadows, clear lighting",
    }
}

/// Expand the user prompt with style, background, and mood phrases.
pub fn assemble_prompt(prompt: &str, style: &str, background: &str, mood: &str) -> String {
    format!(
        "{prompt}, in {} style, {} background, {} atmosphere",
        style_phrase(style),
        background_phrase(background),
        mood_phrase(mood),
    )
}
