//! Intent classifier prompt

pub const CLASSIFIER_TEMPLATE_BODY: &str = r#"Analyze the request below and decide what kind of social media content should be produced.

## Request
{{ user_query }}

## Content Types
Choose exactly one `content_type`:
- `text_only`: the user wants written posts only
- `image_only`: the user wants images only, without a written post
- `text_with_image`: the user wants written posts accompanied by images

If the request does not mention images, prefer `text_only`.

## Other Fields
- `tone`: the desired tone (e.g. professional, casual, humorous, inspirational)
- `platform`: the target platform if one is named (e.g. linkedin, instagram, twitter), otherwise null

## Output Format
Respond with a single JSON object and nothing else:

{"content_type": "text_only", "tone": "professional", "platform": "linkedin"}
"#;
