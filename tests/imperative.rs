use async_trait::async_trait;
use filemod::rules::ParsedPath;
use filemod::{Command, FileLister, MemoryFs, Transform, VirtualLister, execute_commands};
use std::path::{Path, PathBuf};

/// Moves Next.js `pages/` routes to the `app/` layout in plain Rust
struct AppRouterMigration;

#[async_trait]
impl Transform for AppRouterMigration {
    async fn transform(&self, _root: &Path, api: &dyn FileLister) -> filemod::Result<Vec<Command>> {
        let file_paths = api
            .get_file_paths(
                "**/pages/**/*.{js,jsx,ts,tsx}",
                &["**/node_modules/**".to_string(), "**/pages/api/**".to_string()],
            )
            .await?;

        let mut commands = Vec::new();
        for file_path in file_paths {
            let parsed = ParsedPath::parse(&file_path.to_string_lossy());

            if matches!(parsed.file_root.as_str(), "_app" | "_document" | "_error") {
                commands.push(Command::delete(file_path));
                continue;
            }

            let mut dirs: Vec<String> = parsed
                .directory_segments
                .iter()
                .map(|dir| if dir == "pages" { "app".to_string() } else { dir.clone() })
                .collect();
            if parsed.file_root != "index" {
                dirs.push(parsed.file_root.clone());
            }

            let to_path = PathBuf::from(&parsed.root)
                .join(dirs.join("/"))
                .join(format!("page{}", parsed.extension));
            commands.push(Command::move_file(file_path, to_path));
        }

        Ok(commands)
    }
}

#[tokio::test]
async fn imperative_transform_produces_commands() {
    let lister = VirtualLister::new(
        "/opt/project/",
        [
            "/opt/project/pages/index.tsx",
            "/opt/project/pages/_app.tsx",
            "/opt/project/pages/_document.tsx",
            "/opt/project/pages/_error.tsx",
            "/opt/project/pages/[slug]/about.tsx",
        ]
        .map(PathBuf::from),
    );

    let commands = AppRouterMigration
        .transform(Path::new("/opt/project/"), &lister)
        .await
        .unwrap();

    assert_eq!(
        commands,
        vec![
            Command::move_file(
                "/opt/project/pages/[slug]/about.tsx",
                "/opt/project/app/[slug]/about/page.tsx"
            ),
            Command::delete("/opt/project/pages/_app.tsx"),
            Command::delete("/opt/project/pages/_document.tsx"),
            Command::delete("/opt/project/pages/_error.tsx"),
            Command::move_file("/opt/project/pages/index.tsx", "/opt/project/app/page.tsx"),
        ]
    );
}

#[tokio::test]
async fn imperative_commands_run_through_the_same_executor() {
    let fs = MemoryFs::new()
        .with_file("/opt/project/pages/index.tsx", "home")
        .with_file("/opt/project/pages/_app.tsx", "app")
        .with_file("/opt/project/pages/blog/post.tsx", "post");
    let lister = VirtualLister::new("/opt/project", fs.file_paths());

    let (_, summary) = filemod::run(
        &AppRouterMigration,
        Path::new("/opt/project"),
        &lister,
        &fs,
        false,
    )
    .await
    .unwrap();

    assert_eq!(summary.unwrap().total(), 3);
    assert_eq!(
        fs.file_paths(),
        vec![
            PathBuf::from("/opt/project/app/blog/post/page.tsx"),
            PathBuf::from("/opt/project/app/page.tsx"),
        ]
    );
    assert_eq!(fs.read("/opt/project/app/page.tsx").unwrap(), b"home");
}

#[tokio::test]
async fn failed_move_keeps_the_source() {
    let fs = MemoryFs::new()
        .with_file("/opt/project/pages/index.tsx", "home")
        .with_file("/opt/project/pages/about.tsx", "about")
        .fail_writes_to("/opt/project/app/about/page.tsx");
    let lister = VirtualLister::new("/opt/project", fs.file_paths());

    let commands = AppRouterMigration
        .transform(Path::new("/opt/project"), &lister)
        .await
        .unwrap();
    let result = execute_commands(&commands, &fs).await;

    assert!(result.is_err());
    assert_eq!(fs.read("/opt/project/pages/about.tsx").unwrap(), b"about");
    // The batch stopped at the failure, so the later move never ran.
    assert_eq!(fs.read("/opt/project/pages/index.tsx").unwrap(), b"home");
}
