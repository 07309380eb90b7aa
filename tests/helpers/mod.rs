#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use cookshelf::{
    AppState, Config,
    config::{DatabaseConfig, ExportConfig, JwtConfig, ObservabilityConfig, ServerConfig},
};
use cookshelf_recipe::{CreateUserInput, IngredientFixture, TagFixture};
use http_body_util::BodyExt;
use serde_json::Value;
use temp_dir::TempDir;
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 8000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            issuer: "cookshelf".to_owned(),
            audience: "cookshelf".to_owned(),
            expiration_days: 7,
        },
        export: ExportConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    setup_test_app_with(test_config()).await
}

pub async fn setup_test_app_with(mut config: Config) -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    config.database.url = format!("sqlite:{}", dir.child("db.sqlite3").display());

    let pool = cookshelf::db::create_pool(&config.database.url, 1).await?;
    cookshelf_db::migrate(&pool).await?;

    let state = AppState::new(config, cookshelf_shared::State::single(pool));

    Ok(TestApp {
        router: cookshelf::router(state.clone()),
        state,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        Response {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        self.send(request("POST", uri, token, body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.send(request("PATCH", uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(request("DELETE", uri, token, None)).await
    }

    /// Creates a user and returns its bearer token.
    pub async fn login(&self, username: &str) -> anyhow::Result<String> {
        let id = self
            .state
            .command
            .create_user(CreateUserInput {
                email: format!("{username}@cookshelf.test"),
                username: username.to_owned(),
                ..Default::default()
            })
            .await?;

        cookshelf::auth::generate_token(&self.state.config.jwt, id)
    }

    pub async fn seed_catalog(&self) -> anyhow::Result<Catalog> {
        self.state
            .command
            .import_tags(vec![TagFixture {
                name: "Breakfast".to_owned(),
                color: "#E26C2D".to_owned(),
                slug: "breakfast".to_owned(),
            }])
            .await?;

        self.state
            .command
            .import_ingredients(vec![
                IngredientFixture {
                    name: "Flour".to_owned(),
                    measurement_unit: "g".to_owned(),
                },
                IngredientFixture {
                    name: "Milk".to_owned(),
                    measurement_unit: "ml".to_owned(),
                },
            ])
            .await?;

        let tags = self.state.query.tags().await?;
        let ingredients = self.state.query.ingredients(None).await?;

        Ok(Catalog {
            breakfast: tags[0].id.to_owned(),
            flour: ingredients[0].id.to_owned(),
            milk: ingredients[1].id.to_owned(),
        })
    }
}

pub struct Catalog {
    pub breakfast: String,
    pub flour: String,
    pub milk: String,
}

impl Catalog {
    pub fn recipe(&self, name: &str, flour: u32, milk: u32) -> Value {
        serde_json::json!({
            "name": name,
            "text": format!("How to cook {name}"),
            "cooking_time": 20,
            "tags": [self.breakfast],
            "ingredients": [
                {"id": self.flour, "amount": flour},
                {"id": self.milk, "amount": milk},
            ],
        })
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
