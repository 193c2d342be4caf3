//! 前端静态资源路由
//!
//! 前端构建产物通过 rust-embed 编译进二进制。非 API 的 GET 请求
//! 找不到对应文件时回退到 index.html，由前端路由接管。
//! 开发时 `./frontend-custom/` 下的同名文件优先于嵌入资源。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::borrow::Cow;
use std::path::Path;

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const INDEX_HTML: &str = "index.html";
const OVERRIDE_DIR: &str = "./frontend-custom";

fn extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

fn content_type_for(path: &str) -> &'static str {
    match extension(path) {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" | "webmanifest" => "application/json; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// 打包工具生成的带 hash 资源可以长期缓存，html 不缓存
fn is_immutable_asset(path: &str) -> bool {
    path.starts_with("assets/")
        && matches!(
            extension(path),
            "js" | "mjs" | "css" | "woff" | "woff2" | "png" | "jpg" | "jpeg" | "svg" | "webp"
        )
}

fn load_file(path: &str) -> Option<Cow<'static, [u8]>> {
    std::fs::read(Path::new(OVERRIDE_DIR).join(path))
        .ok()
        .map(Cow::Owned)
        .or_else(|| FrontendAssets::get(path).map(|file| file.data))
}

/// 找到请求的资源，不存在时回退到 index.html
fn resolve_asset(path: &str) -> Option<(Cow<'static, [u8]>, &str)> {
    let path = path.trim_start_matches('/');
    if !path.is_empty()
        && !path.contains("..")
        && let Some(data) = load_file(path)
    {
        return Some((data, path));
    }
    load_file(INDEX_HTML).map(|data| (data, INDEX_HTML))
}

fn placeholder_page(system_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{system_name}</title>
</head>
<body>
    <h1>{system_name}</h1>
    <p>The web client has not been bundled into this build.</p>
    <p>The REST API is available under <code>/api/v1</code>.</p>
</body>
</html>"#
    )
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let tail = req.match_info().query("tail");

    // 未匹配的 API 路径返回 JSON 而不是页面
    if tail.starts_with("api/") || tail == "api" {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("No API route for /{tail}"),
        )));
    }

    match resolve_asset(tail) {
        Some((data, path)) => {
            let cache_control = if is_immutable_asset(path) {
                "public, max-age=31536000, immutable"
            } else {
                "no-cache"
            };
            Ok(HttpResponse::Ok()
                .content_type(content_type_for(path))
                .insert_header(("Cache-Control", cache_control))
                .body(data.into_owned()))
        }
        None => Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(placeholder_page(&AppConfig::get().app.system_name))),
    }
}

/// 放在所有 API 路由之后注册
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            content_type_for("assets/app-3f2a.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(content_type_for("favicon.ico"), "image/x-icon");
        assert_eq!(content_type_for("LICENSE"), "application/octet-stream");
    }

    #[test]
    fn test_immutable_assets() {
        assert!(is_immutable_asset("assets/index-a1b2.css"));
        assert!(!is_immutable_asset("index.html"));
        assert!(!is_immutable_asset("manifest.json"));
        assert!(!is_immutable_asset("logo.png"));
    }

    #[test]
    fn test_placeholder_page_uses_system_name() {
        assert!(placeholder_page("SkillLink").contains("<title>SkillLink</title>"));
    }
}
