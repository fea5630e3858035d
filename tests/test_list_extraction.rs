use recipe_extract::{RecipeExtractor, RuleSet};

async fn mock_page(server: &mut mockito::ServerGuard, html: &str) -> (mockito::Mock, String) {
    let mock = server
        .mock("GET", "/recipe")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(html)
        .create_async()
        .await;
    (mock, format!("{}/recipe", server.url()))
}

fn recipe_html(json_ld: &str, body: &str) -> String {
    format!(
        r#"<html>
            <head><script type="application/ld+json">{json_ld}</script></head>
            <body>{body}</body>
        </html>"#
    )
}

#[tokio::test]
async fn test_structured_data_wins_over_headings() {
    let _ = env_logger::try_init();
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Simple Bread",
        "recipeIngredient": ["2 cups flour", "1 tsp salt"],
        "recipeInstructions": [
            {"@type": "HowToStep", "text": "Mix the flour and salt with warm water."},
            {"@type": "HowToStep", "text": "Bake in a hot oven for thirty minutes."}
        ]
    }
    "#;
    let body = r#"
        <h2>Ingredients</h2>
        <ul><li>3 cups sugar</li></ul>
        <h2>Method</h2>
        <ol><li>Stir the sugar into the pot until dissolved.</li></ol>
    "#;
    let (_m, url) = mock_page(&mut server, &recipe_html(json_ld, body)).await;
    let extractor = RecipeExtractor::builder().build().unwrap();

    let ingredients = extractor.ingredients(&url).await.unwrap();
    assert_eq!(ingredients, vec!["2 cups flour", "1 tsp salt"]);

    let instructions = extractor.instructions(&url).await.unwrap();
    assert_eq!(
        instructions,
        vec![
            "Mix the flour and salt with warm water",
            "Bake in a hot oven for thirty minutes"
        ]
    );
}

#[tokio::test]
async fn test_recipe_inside_graph_with_array_type() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebPage", "name": "Home"},
            {"@type": ["RECIPE"], "name": "Graph Soup", "recipeIngredient": ["1 onion, diced", "4 cups stock"]}
        ]
    }
    "#;
    let (_m, url) = mock_page(&mut server, &recipe_html(json_ld, "<h1>Something Else</h1>")).await;
    let extractor = RecipeExtractor::builder().build().unwrap();

    assert_eq!(extractor.title(&url).await.unwrap(), "Graph Soup");
    assert_eq!(
        extractor.ingredients(&url).await.unwrap(),
        vec!["1 onion, diced", "4 cups stock"]
    );
}

#[tokio::test]
async fn test_malformed_structured_data_falls_through() {
    let mut server = mockito::Server::new_async().await;
    let html = recipe_html(
        "{ not json",
        r#"<h3>Ingredients</h3><ul><li>1 cup rice</li><li>2 cups water</li></ul>"#,
    );
    let (_m, url) = mock_page(&mut server, &html).await;
    let extractor = RecipeExtractor::builder().build().unwrap();

    assert_eq!(
        extractor.ingredients(&url).await.unwrap(),
        vec!["1 cup rice", "2 cups water"]
    );
}

#[tokio::test]
async fn test_template_selectors_when_no_heading() {
    let mut server = mockito::Server::new_async().await;
    let html = r#"
        <html><body>
            <div class="wprm-recipe-ingredient">1 cup sugar</div>
            <div class="wprm-recipe-ingredient">2 eggs</div>
        </body></html>
    "#;
    let (_m, url) = mock_page(&mut server, html).await;
    let extractor = RecipeExtractor::builder().build().unwrap();

    assert_eq!(extractor.ingredients(&url).await.unwrap(), vec!["1 cup sugar", "2 eggs"]);
}

#[tokio::test]
async fn test_section_label_is_kept_as_ingredient_only() {
    let mut server = mockito::Server::new_async().await;
    let html = r#"
        <html><body>
            <h2>Ingredients</h2>
            <ul><li>Ingredients</li><li>2 cups flour</li><li>1 tsp salt</li></ul>
            <h2>Directions</h2>
            <ol><li>Ingredients</li><li>Mix ingredients together in a bowl</li></ol>
        </body></html>
    "#;
    let (_m, url) = mock_page(&mut server, html).await;
    let extractor = RecipeExtractor::builder().build().unwrap();

    assert_eq!(
        extractor.ingredients(&url).await.unwrap(),
        vec!["Ingredients", "2 cups flour", "1 tsp salt"]
    );
    assert_eq!(
        extractor.instructions(&url).await.unwrap(),
        vec!["Mix ingredients together in a bowl"]
    );
}

#[tokio::test]
async fn test_results_are_capped_in_document_order() {
    let mut server = mockito::Server::new_async().await;
    let items: String = (1..=60)
        .map(|i| format!("<li>{i} cups flour</li>"))
        .collect();
    let html = format!("<html><body><h2>Ingredients</h2><ul>{items}</ul></body></html>");
    let (_m, url) = mock_page(&mut server, &html).await;

    let extractor = RecipeExtractor::builder().build().unwrap();
    let ingredients = extractor.ingredients(&url).await.unwrap();
    assert_eq!(ingredients.len(), 50);
    assert_eq!(ingredients[0], "1 cups flour");
    assert_eq!(ingredients[49], "50 cups flour");

    let mut rules = RuleSet::default();
    rules.ingredients.cap = 20;
    let capped = RecipeExtractor::builder().rules(rules).build().unwrap();
    assert_eq!(capped.ingredients(&url).await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_page_without_recipe_yields_empty_lists() {
    let mut server = mockito::Server::new_async().await;
    let html = "<html><body><p>Nothing to cook here.</p></body></html>";
    let (_m, url) = mock_page(&mut server, html).await;
    let extractor = RecipeExtractor::builder().build().unwrap();

    assert!(extractor.ingredients(&url).await.unwrap().is_empty());
    assert!(extractor.instructions(&url).await.unwrap().is_empty());
}
