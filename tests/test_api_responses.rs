use recipe_extract::{api, ExtractionRequest, Field, RecipeExtractor};
use serde_json::Value;

const FRY_BREAD_INGREDIENTS: &str = r#"
<html>
    <head><title>Navajo Fry Bread</title></head>
    <body>
        <h1>Navajo Fry Bread</h1>
        <h2>Ingredients</h2>
        <ul>
            <li>2 cups oil for frying</li>
            <li>4 cups all-purpose flour</li>
            <li>3 tablespoons baking powder</li>
            <li>2 teaspoons salt</li>
            <li>2 ½ cups warm milk</li>
        </ul>
    </body>
</html>
"#;

const FRY_BREAD_INSTRUCTIONS: &str = r#"
<html>
    <head><title>Navajo Fry Bread</title></head>
    <body>
        <h1>Navajo Fry Bread</h1>
        <h2>Directions</h2>
        <ol>
            <li>Heat oil in a deep fryer or large saucepan to 375 degrees F (190 degrees C).</li>
            <li>Combine flour, baking powder, and salt in a large bowl; mix in milk to form a soft dough.</li>
            <li>Lower dough rounds, about 3 or 4 at a time, carefully into hot oil.</li>
        </ol>
    </body>
</html>
"#;

async fn serve(server: &mut mockito::ServerGuard, path: &str, html: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(html)
        .create_async()
        .await
}

fn extractor() -> RecipeExtractor {
    let _ = env_logger::try_init();
    RecipeExtractor::builder().build().unwrap()
}

#[tokio::test]
async fn test_ingredients_response() {
    let mut server = mockito::Server::new_async().await;
    let _m = serve(&mut server, "/fry-bread", FRY_BREAD_INGREDIENTS).await;
    let url = format!("{}/fry-bread", server.url());

    let response = api::handle(&extractor(), Field::Ingredients, &ExtractionRequest::new(&url)).await;
    assert_eq!(response.status(), 200);

    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Ingredients extracted successfully");
    assert_eq!(body["url"], Value::String(url));
    assert_eq!(body["count"], 5);
    assert_eq!(
        body["ingredients"],
        serde_json::json!([
            "2 cups oil for frying",
            "4 cups all-purpose flour",
            "3 tablespoons baking powder",
            "2 teaspoons salt",
            "2 1/2 cups warm milk"
        ])
    );
}

#[tokio::test]
async fn test_instructions_response() {
    let mut server = mockito::Server::new_async().await;
    let _m = serve(&mut server, "/fry-bread", FRY_BREAD_INSTRUCTIONS).await;
    let url = format!("{}/fry-bread", server.url());

    let response = api::handle(&extractor(), Field::Instructions, &ExtractionRequest::new(&url)).await;
    assert_eq!(response.status(), 200);

    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["message"], "Instructions extracted successfully");
    assert_eq!(body["count"], 3);

    let steps: Vec<&str> = body["instructions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert!(steps[0].starts_with("Heat oil in a deep fryer"));
    assert!(steps[1].starts_with("Combine flour, baking powder"));
    assert!(steps[2].starts_with("Lower dough rounds"));
}

#[tokio::test]
async fn test_missing_url_is_a_bad_request() {
    let extractor = extractor();
    for request in [ExtractionRequest::default(), ExtractionRequest::new("   ")] {
        let response = api::handle(&extractor, Field::Title, &request).await;
        assert_eq!(response.status(), 400);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"error": "URL is required"})
        );
    }
}

#[tokio::test]
async fn test_unreachable_url_is_reported_with_details() {
    let request = ExtractionRequest::new("http://127.0.0.1:1/recipe");
    let response = api::handle(&extractor(), Field::Title, &request).await;

    assert_eq!(response.status(), 500);
    assert!(!response.is_success());
    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["error"], "Failed to extract recipe title");
    assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
}

#[tokio::test]
async fn test_error_status_from_site_is_a_failure() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/gone")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;
    let url = format!("{}/gone", server.url());

    let response = api::handle(&extractor(), Field::Metadata, &ExtractionRequest::new(url)).await;
    assert_eq!(response.status(), 500);
    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["error"], "Failed to extract recipe metadata");
    assert!(body["details"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn test_handle_all_combines_every_field() {
    let mut server = mockito::Server::new_async().await;
    let html = r#"
        <html><head><title>Pancakes</title></head><body>
            <h2>Ingredients</h2>
            <ul><li>1 cup flour</li><li>1 cup milk</li></ul>
            <h2>Instructions</h2>
            <ol><li>Whisk the flour and milk together.</li></ol>
        </body></html>
    "#;
    let mock = server
        .mock("GET", "/pancakes")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(html)
        .expect(4)
        .create_async()
        .await;
    let url = format!("{}/pancakes", server.url());

    let combined = api::handle_all(&extractor(), &ExtractionRequest::new(&url)).await;
    assert!(combined.success);
    assert_eq!(combined.status(), 200);

    let body = serde_json::to_value(&combined).unwrap();
    assert_eq!(body["title"]["title"], "Pancakes");
    assert_eq!(body["ingredients"]["count"], 2);
    assert_eq!(body["instructions"]["instructions"][0], "Whisk the flour and milk together");
    assert_eq!(body["metadata"]["metadata"]["cookTime"], "N/A");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_handle_all_without_url() {
    let combined = api::handle_all(&extractor(), &ExtractionRequest::default()).await;
    assert!(!combined.success);
    assert_eq!(combined.status(), 400);
    assert_eq!(combined.ingredients.status(), 400);
}
