use std::fs;
use std::path::{Path, PathBuf};

// rust-embed 要求目录在编译时存在，前端未构建时写入占位页面
const PLACEHOLDER_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SkillLink</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 640px; margin: 80px auto; padding: 0 20px; }
        code { background: #f1f3f4; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>SkillLink</h1>
    <p>This build does not include the web client.</p>
    <p>Build it with <code>cd frontend &amp;&amp; bun install &amp;&amp; bun run build</code> and rebuild the server.</p>
    <p>The REST API is served under <code>/api/v1</code>.</p>
</body>
</html>
"#;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let dist: PathBuf = Path::new(&manifest_dir).join("frontend").join("dist");

    if dist.join("index.html").exists() {
        return;
    }

    println!("cargo:warning=frontend/dist not found, embedding a placeholder page");
    fs::create_dir_all(dist.join("assets")).expect("create frontend/dist/assets");
    fs::write(dist.join("index.html"), PLACEHOLDER_INDEX).expect("write placeholder index.html");
}
