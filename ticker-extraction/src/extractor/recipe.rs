use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::llm::{ImageAttachment, LlmClient};

/// Output of a recipe recommendation
#[derive(Debug, Clone)]
pub struct RecipeRecommendation {
    /// The ingredient list the recipe was generated from (typed, extracted
    /// from the photo, or both combined)
    pub ingredients: String,
    /// Generated recipe text, markdown formatted
    pub recipe: String,
}

/// Recipe recommender, the surviving endpoint of the earlier recipe
/// variant.
///
/// Generates a recipe from an ingredient list; when a food-photo index is
/// given, the vision model first lists the ingredients visible in
/// `food{N}.webp` under the photos directory. No vector retrieval is
/// involved (the store holds company documents).
pub struct RecipeRecommender {
    llm_client: Arc<LlmClient>,
    photos_dir: PathBuf,
}

impl RecipeRecommender {
    pub fn new(llm_client: Arc<LlmClient>, photos_dir: impl Into<PathBuf>) -> Self {
        Self {
            llm_client,
            photos_dir: photos_dir.into(),
        }
    }

    /// Recommend a recipe from typed ingredients and/or a food photo index
    pub async fn recommend(
        &self,
        ingredients: Option<&str>,
        image_index: Option<u32>,
    ) -> Result<RecipeRecommendation> {
        let mut parts: Vec<String> = Vec::new();

        if let Some(list) = ingredients {
            let trimmed = list.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }

        if let Some(index) = image_index {
            let extracted = self.extract_image_ingredients(index).await?;
            if !extracted.is_empty() {
                parts.push(extracted);
            }
        }

        if parts.is_empty() {
            bail!("No ingredients or food photo provided");
        }

        let combined = parts.join(", ");
        let prompt = format_recipe_prompt(&combined);

        let response = self.llm_client.complete(prompt).await?;

        Ok(RecipeRecommendation {
            ingredients: combined,
            recipe: response.raw_response,
        })
    }

    /// Ask the vision model to list the ingredients visible in a food photo
    pub async fn extract_image_ingredients(&self, image_index: u32) -> Result<String> {
        let path = self.photo_path(image_index);
        tracing::info!("Extracting ingredients from {}", path.display());

        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read photo {}", path.display()))?;

        let image = ImageAttachment {
            mime_type: "image/webp".to_string(),
            data,
        };

        let response = self
            .llm_client
            .complete_with_image(IMAGE_INGREDIENTS_PROMPT.to_string(), &image)
            .await?;

        Ok(response.raw_response.trim().to_string())
    }

    fn photo_path(&self, image_index: u32) -> PathBuf {
        self.photos_dir.join(format!("food{}.webp", image_index))
    }
}

const IMAGE_INGREDIENTS_PROMPT: &str = "List the food items and ingredients visible in this \
     photo. Answer with a comma-separated list only.";

fn format_recipe_prompt(ingredients: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("═══ RECIPE RECOMMENDATION ═══\n\n");
    prompt.push_str("AVAILABLE INGREDIENTS:\n");
    prompt.push_str(ingredients);
    prompt.push_str("\n\n");
    prompt.push_str("TASK:\n");
    prompt.push_str("Recommend one recipe that can be cooked from these ingredients.\n");
    prompt.push_str("Add the instructions for that recipe, formatted as markdown.\n");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmConfig;

    fn recommender() -> RecipeRecommender {
        let client = Arc::new(LlmClient::new(LlmConfig::default(), "test-key".to_string()).unwrap());
        RecipeRecommender::new(client, "/data/example_food_photos")
    }

    #[test]
    fn test_photo_path_format() {
        let recommender = recommender();
        assert_eq!(
            recommender.photo_path(3),
            PathBuf::from("/data/example_food_photos/food3.webp")
        );
    }

    #[test]
    fn test_recipe_prompt_format() {
        let prompt = format_recipe_prompt("eggs, flour, milk");

        assert!(prompt.contains("AVAILABLE INGREDIENTS"));
        assert!(prompt.contains("eggs, flour, milk"));
        assert!(prompt.contains("formatted as markdown"));
    }

    #[tokio::test]
    async fn test_recommend_requires_input() {
        let recommender = recommender();
        let result = recommender.recommend(None, None).await;
        assert!(result.is_err());

        let result = recommender.recommend(Some("   "), None).await;
        assert!(result.is_err());
    }
}
