//! Turns a query plus retrieved recipes into a finished HTML article.

use askama::Template;
use std::fmt::Write;
use std::sync::Arc;
use tracing::debug;

use crate::llm::{CompletionOptions, LanguageModel};
use crate::retrieval::RecipeRecord;
use crate::utils::sanitize::{sanitize_html, strip_code_fences, truncate};
use crate::{Error, Result};

const MAX_INSTRUCTIONS_CHARS: usize = 600;

#[derive(Template)]
#[template(path = "article.html")]
struct ArticleTemplate {
    body: String,
    recipes: Vec<FeaturedRecipe>,
}

#[allow(dead_code)] // Fields are used by Askama templates
struct FeaturedRecipe {
    title: String,
    summary: String,
    url: String,
    tags: Vec<String>,
}

impl From<&RecipeRecord> for FeaturedRecipe {
    fn from(recipe: &RecipeRecord) -> Self {
        Self {
            title: recipe.title.clone(),
            summary: recipe.summary.clone().unwrap_or_default(),
            // Only link out to web URLs
            url: recipe
                .url
                .clone()
                .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
                .unwrap_or_default(),
            tags: recipe.tags.clone(),
        }
    }
}

/// Writes articles grounded in retrieved recipes
#[derive(Clone)]
pub struct ArticleGenerator {
    llm: Arc<dyn LanguageModel>,
    options: CompletionOptions,
}

impl ArticleGenerator {
    pub fn new(llm: Arc<dyn LanguageModel>, options: CompletionOptions) -> Self {
        Self { llm, options }
    }

    pub async fn generate_professional_article(
        &self,
        query: &str,
        recipes: &[RecipeRecord],
    ) -> Result<String> {
        if recipes.is_empty() {
            return Err(Error::Generation(
                "No recipes to build the article from".to_string(),
            ));
        }

        let prompt = build_grounded_prompt(query, recipes);
        debug!(
            "Generating article for {:?} from {} recipes with {}",
            query,
            recipes.len(),
            self.llm.model_name()
        );

        let raw = self.llm.complete(&prompt, self.options).await?;
        let body = sanitize_html(strip_code_fences(&raw));

        let template = ArticleTemplate {
            body,
            recipes: recipes.iter().map(FeaturedRecipe::from).collect(),
        };
        Ok(template.render()?)
    }
}

/// Prompt listing every retrieved recipe so the article stays on the data
pub fn build_grounded_prompt(query: &str, recipes: &[RecipeRecord]) -> String {
    let mut prompt = format!(
        "Write a professional article about \"{query}\" based on the following recipes from our database.\n\n"
    );

    for (i, recipe) in recipes.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = writeln!(prompt, "Recipe {}: {}", i + 1, recipe.title);
        if let Some(summary) = recipe.summary.as_deref().filter(|s| !s.is_empty()) {
            let _ = writeln!(prompt, "Summary: {summary}");
        }
        if !recipe.ingredients.is_empty() {
            let _ = writeln!(prompt, "Ingredients: {}", recipe.ingredients.join(", "));
        }
        if let Some(instructions) = recipe.instructions.as_deref().filter(|s| !s.is_empty()) {
            let _ = writeln!(
                prompt,
                "Instructions: {}",
                truncate(instructions, MAX_INSTRUCTIONS_CHARS)
            );
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Create a compelling article with:
- An engaging introduction
- One section per recipe above, describing what makes it worth cooking
- Cooking tips drawn from the recipes
- A conclusion

Only describe the recipes listed above. Format the response as HTML with proper headings and paragraphs, without <html>, <head> or <body> tags.
",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, prompt: &str, _options: CompletionOptions) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn recipe(id: &str, title: &str) -> RecipeRecord {
        RecipeRecord {
            id: id.to_string(),
            title: title.to_string(),
            summary: Some(format!("A classic {title}")),
            ingredients: vec!["salt".to_string(), "pepper".to_string()],
            instructions: Some("Simmer gently.".to_string()),
            tags: vec!["dinner".to_string()],
            url: Some("https://example.com/r".to_string()),
            embedding: Vec::new(),
        }
    }

    fn generator(reply: &str) -> (ArticleGenerator, Arc<ScriptedModel>) {
        let model = Arc::new(ScriptedModel {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let options = CompletionOptions {
            temperature: 0.7,
            max_tokens: 2000,
        };
        (ArticleGenerator::new(model.clone(), options), model)
    }

    #[test]
    fn test_prompt_lists_recipes() {
        let prompt = build_grounded_prompt("soup", &[recipe("1", "Chicken Soup")]);

        assert!(prompt.contains("\"soup\""));
        assert!(prompt.contains("Recipe 1: Chicken Soup"));
        assert!(prompt.contains("Ingredients: salt, pepper"));
        assert!(prompt.contains("Instructions: Simmer gently."));
    }

    #[tokio::test]
    async fn test_article_wraps_model_output_and_recipes() {
        let (generator, model) = generator("```html\n<h1>Soups</h1><script>x()</script>\n```");

        let html = generator
            .generate_professional_article("soup", &[recipe("1", "Chicken <Soup>")])
            .await
            .unwrap();

        assert!(html.contains("<h1>Soups</h1>"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("```"));
        // titles are escaped by the template
        assert!(html.contains("Chicken &lt;Soup&gt;"));
        assert!(html.contains("example.com"));
        assert_eq!(model.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_recipes_is_an_error() {
        let (generator, model) = generator("<p>unused</p>");

        let result = generator.generate_professional_article("soup", &[]).await;
        assert!(matches!(result, Err(Error::Generation(_))));
        assert!(model.prompts.lock().unwrap().is_empty());
    }
}
