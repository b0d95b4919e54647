use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Image fixture rendered on the test page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestImage {
    /// Template identifier
    pub id: String,
    /// Text lines drawn on the image
    pub lines: Vec<String>,
    /// Output file extension, without the leading dot
    pub extension: String,
}

impl TestImage {
    pub fn new(id: &str, lines: &[&str], extension: &str) -> Self {
        Self {
            id: id.to_string(),
            lines: lines.iter().map(|line| line.to_string()).collect(),
            extension: extension.to_string(),
        }
    }
}

/// Catalog settings, normally read from `catalog.yml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one subdirectory per template
    pub templates_dir: PathBuf,

    /// Reload the catalog whenever a file under `templates_dir` changes
    pub auto_reload: bool,

    /// Prefix for generated URLs (e.g. `https://api.example.com`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Extension used for still images
    pub default_static_extension: String,

    /// Extension used for animated images
    pub default_animated_extension: String,

    /// Extensions that produce animated output
    pub animated_extensions: Vec<String>,

    /// Fixtures listed on the test page
    pub test_images: Vec<TestImage>,
}

impl Settings {
    pub fn is_animated_extension(&self, extension: &str) -> bool {
        self.animated_extensions
            .iter()
            .any(|animated| animated.eq_ignore_ascii_case(extension))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            auto_reload: false,
            base_url: None,
            default_static_extension: "png".to_string(),
            default_animated_extension: "gif".to_string(),
            animated_extensions: vec!["gif".to_string(), "webp".to_string()],
            test_images: default_test_images(),
        }
    }
}

fn default_test_images() -> Vec<TestImage> {
    vec![
        TestImage::new("iw", &["tests code", "in production"], "jpg"),
        TestImage::new("fry", &["a", "b"], "png"),
        TestImage::new(
            "fry",
            &["short line", "longer line of text than the short one"],
            "webp",
        ),
        TestImage::new(
            "fry",
            &["longer line of text than the short one", "short line"],
            "gif",
        ),
        TestImage::new("sparta", &["", "this is a wide image"], "png"),
        TestImage::new(
            "ski",
            &[
                "if you try to put a bunch more text than can possibly fit on a meme",
                "you're gonna have a bad time",
            ],
            "png",
        ),
        TestImage::new(
            "ds",
            &["Push this button.", "Push that button.", "can't decide which is worse"],
            "png",
        ),
        TestImage::new(
            "spongebob",
            &["You: Stop talking like that", "Me: Stop talking like that"],
            "gif",
        ),
    ]
}
