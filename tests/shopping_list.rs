mod helpers;

use axum::http::{StatusCode, header};
use cookshelf::config::ExportConfig;
use cookshelf_recipe::IngredientFixture;

#[tokio::test]
async fn test_download_shopping_cart() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    let catalog = app.seed_catalog().await?;
    let token = app.login("alice").await?;

    for (name, flour, milk) in [("Pancakes", 200, 300), ("Crepes", 100, 250)] {
        let res = app
            .post("/api/recipes/", Some(&token), Some(catalog.recipe(name, flour, milk)))
            .await;
        let id = res.json()["id"].as_str().unwrap().to_owned();

        let res = app
            .post(&format!("/api/recipes/{id}/shopping_cart/"), Some(&token), None)
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let list = cookshelf_shopping::build_shopping_list(app.state.store.as_ref(), "nobody").await?;
    assert!(list.is_empty());

    let res = app
        .get("/api/recipes/download_shopping_cart/", Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        res.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Shopping_list.pdf\""
    );
    assert!(res.body.starts_with(b"%PDF"));

    Ok(())
}

#[tokio::test]
async fn test_shopping_cart_messages() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    let catalog = app.seed_catalog().await?;
    let token = app.login("alice").await?;

    let res = app
        .post("/api/recipes/", Some(&token), Some(catalog.recipe("Pancakes", 200, 300)))
        .await;
    let id = res.json()["id"].as_str().unwrap().to_owned();
    let uri = format!("/api/recipes/{id}/shopping_cart/");

    let res = app.delete(&uri, Some(&token)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["message"], "Recipe not in shopping cart");

    app.post(&uri, Some(&token), None).await;
    let res = app.post(&uri, Some(&token), None).await;
    assert_eq!(res.json()["message"], "Recipe already in shopping cart");

    let res = app
        .get("/api/recipes/?is_in_shopping_cart=1", Some(&token))
        .await;
    assert_eq!(res.json()["results"][0]["is_in_shopping_cart"], true);

    Ok(())
}

#[tokio::test]
async fn test_download_without_font() -> anyhow::Result<()> {
    let mut config = helpers::test_config();
    config.export = ExportConfig {
        font_name: "Comic Sans".to_owned(),
        ..Default::default()
    };

    let app = helpers::setup_test_app_with(config).await?;
    let token = app.login("alice").await?;

    let res = app
        .get("/api/recipes/download_shopping_cart/", Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json()["error"], "export_unavailable");

    let res = app.get("/api/tags/", None).await;
    assert_eq!(res.status, StatusCode::OK);

    Ok(())
}

async fn download_cyrillic_list(export: ExportConfig) -> anyhow::Result<helpers::Response> {
    let mut config = helpers::test_config();
    config.export = export;

    let app = helpers::setup_test_app_with(config).await?;
    let catalog = app.seed_catalog().await?;
    app.state
        .command
        .import_ingredients(vec![IngredientFixture {
            name: "Мука".to_owned(),
            measurement_unit: "г".to_owned(),
        }])
        .await?;
    let ingredients = app.state.query.ingredients(Some("Мука")).await?;
    let token = app.login("alice").await?;

    let mut recipe = catalog.recipe("Блины", 200, 300);
    recipe["ingredients"] = serde_json::json!([{ "id": ingredients[0].id, "amount": 350 }]);
    let res = app.post("/api/recipes/", Some(&token), Some(recipe)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.json()["id"].as_str().unwrap().to_owned();

    app.post(&format!("/api/recipes/{id}/shopping_cart/"), Some(&token), None)
        .await;

    Ok(app
        .get("/api/recipes/download_shopping_cart/", Some(&token))
        .await)
}

#[tokio::test]
async fn test_download_cyrillic_entries() -> anyhow::Result<()> {
    let res = download_cyrillic_list(ExportConfig::default()).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.starts_with(b"%PDF"));

    let res = download_cyrillic_list(ExportConfig {
        font_name: "Helvetica".to_owned(),
        ..Default::default()
    })
    .await?;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json()["error"], "export_unavailable");

    Ok(())
}
