use insta::assert_snapshot;
use once_cell::sync::Lazy;
use slotdown_render::{
    BatchInput, BatchOptions, Compiler, CompilerOptions, Layout, PageContext, PropSchema,
    Registry, RenderError, render_batch, unit,
};

fn wrap(open: &'static str, close: &'static str) -> std::sync::Arc<dyn slotdown_render::Component> {
    unit(PropSchema::new(), move |_, ctx, w| {
        w.write_all(open.as_bytes())?;
        ctx.render_children(w)?;
        w.write_all(close.as_bytes())?;
        Ok(())
    })
}

fn site_layout() -> Layout {
    let mut layout = Layout::new("Site");

    layout
        .register(
            "Features",
            unit(PropSchema::new().component("Title"), |props, ctx, w| {
                w.write_all(b"<section class=\"features\">")?;
                if let Some(title) = props.component("Title") {
                    title.render(ctx, w)?;
                }
                ctx.render_children(w)?;
                w.write_all(b"</section>")?;
                Ok(())
            }),
        )
        .unwrap();

    layout
        .register(
            "Card",
            unit(
                PropSchema::new().string("Title").component("Icon"),
                |props, ctx, w| {
                    w.write_all(b"<div class=\"card\">")?;
                    if let Some(icon) = props.component("Icon") {
                        icon.render(ctx, w)?;
                    }
                    let title = props.string("Title").unwrap_or_default();
                    write!(w, "<h4>{}</h4>", html_escape::encode_text(title))?;
                    ctx.render_children(w)?;
                    w.write_all(b"</div>")?;
                    Ok(())
                },
            ),
        )
        .unwrap();

    layout
        .register(
            "IconLightning",
            unit(
                PropSchema::new().int("Size").string("Variant"),
                |props, _, w| {
                    let size = props.int("Size").unwrap_or(16);
                    let variant = props.string("Variant").unwrap_or("solid").to_lowercase();
                    write!(w, "<svg class=\"icon-{variant}\" width=\"{size}\" height=\"{size}\"></svg>")?;
                    Ok(())
                },
            ),
        )
        .unwrap();

    layout
        .register(
            "DocsLayout",
            unit(PropSchema::new().component("Header"), |props, ctx, w| {
                w.write_all(b"<div class=\"docs\"><header>")?;
                if let Some(header) = props.component("Header") {
                    header.render(ctx, w)?;
                }
                w.write_all(b"</header><article>")?;
                ctx.render_children(w)?;
                w.write_all(b"</article></div>")?;
                Ok(())
            }),
        )
        .unwrap();

    layout
        .register("Navbar", wrap("<nav>", "</nav>"))
        .unwrap()
        .register(
            "Link",
            unit(
                PropSchema::new().string("Href").attributes("Attrs"),
                |props, ctx, w| {
                    write!(w, "<a href=\"{}\"", props.string("Href").unwrap_or("#"))?;
                    for (name, value) in props.attributes("Attrs").unwrap_or_default() {
                        write!(w, " {}=\"{}\"", name.to_lowercase(), value)?;
                    }
                    w.write_all(b">")?;
                    ctx.render_children(w)?;
                    w.write_all(b"</a>")?;
                    Ok(())
                },
            ),
        )
        .unwrap();

    layout
        .register(
            "PageUrl",
            unit(PropSchema::new(), |_, ctx, w| {
                let url = ctx.page().map(|p| p.url.as_str()).unwrap_or_default();
                write!(w, "<code>{url}</code>")?;
                Ok(())
            }),
        )
        .unwrap();

    layout
}

static SITE: Lazy<Compiler> = Lazy::new(|| Compiler::new(site_layout()));

const LANDING: &str = r####"# Welcome

```slotdown
\Features
    Title: "### A robust set of features"
    \Card
        Title: "Blazing Fast"
        Icon:
            \IconLightning
                Size: 24
                Variant: "DuoTone"
        Rendered at build time.
```
"####;

const DOCS_LAYOUT: &str = r#"```slotdown
\DocsLayout
    Header:
        \Navbar
            \Link
                Href: "/blog"
                Blog
            \Link
                Href: "/docs"
                !Active
                Docs
    \Slot
```
"#;

#[test]
fn test_landing_page() {
    let html = SITE.render_to_string(LANDING).unwrap();
    assert_snapshot!(html, @r#"<h1 id="welcome">Welcome</h1><section class="features"><h3 id="a-robust-set-of-features">A robust set of features</h3><div class="card"><svg class="icon-duotone" width="24" height="24"></svg><h4>Blazing Fast</h4><p>Rendered at build time.</p></div></section>"#);
}

#[test]
fn test_page_renders_inside_layout_slot() {
    let mut out = Vec::new();
    SITE.render_page(
        DOCS_LAYOUT,
        "# Getting started\n\nInstall it.",
        PageContext::new("/docs/start"),
        &mut out,
    )
    .unwrap();
    let html = String::from_utf8(out).unwrap();
    assert_snapshot!(html, @r#"<div class="docs"><header><nav><a href="/blog"><p>Blog</p></a><a href="/docs" active="true"><p>Docs</p></a></nav></header><article><h1 id="getting-started">Getting started</h1><p>Install it.</p></article></div>"#);
}

#[test]
fn test_layout_without_page_fails_at_slot() {
    let err = SITE.render_to_string(DOCS_LAYOUT).unwrap_err();
    assert_snapshot!(err.to_string(), @"component DocsLayout: slot not found in render context");
}

#[test]
fn test_markdown_child_lines_keep_their_markers() {
    let html = SITE
        .render_to_string("```slotdown\n\\Navbar\n    ![logo](/logo.png)\n    \\*not emphasis\\*\n```")
        .unwrap();
    assert_snapshot!(html, @r#"<nav><p><img src="/logo.png" alt="logo" /></p><p>*not emphasis*</p></nav>"#);
}

#[test]
fn test_nested_binding_errors_carry_the_component_path() {
    let source = LANDING.replace("Size: 24", "Size: \"big\"");
    let err = SITE.render_to_string(&source).unwrap_err();
    assert_snapshot!(err.to_string(), @r#"component Features: component Card: component IconLightning: property Size expects integer got "big""#);
}

#[test]
fn test_markup_errors_point_into_the_document() {
    let source = "intro\n\n```slotdown\n\\Card\n    Icon:\n        \\IconLightning\n        \\IconLightning\n```\n";
    match SITE.render_to_string(source).unwrap_err() {
        RenderError::Markup(err) => {
            assert_snapshot!(err.to_string(), @"5:10 a property value can only contain one component got 2");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_serialized_markup_renders_identically() {
    let markup = "\\Card\n    Title: \"Say \\\"hi\\\"\"\n    Icon:\n        \\IconLightning\n            Size: 12\n    Body text";
    let document = slotdown_core::parse(markup).unwrap();
    let reserialized = document.to_markup();

    let fence = |m: &str| format!("```slotdown\n{m}\n```");
    let first = SITE.render_to_string(&fence(markup)).unwrap();
    let second = SITE.render_to_string(&fence(&reserialized)).unwrap();
    assert_eq!(first, second);
    assert_snapshot!(first, @r#"<div class="card"><svg class="icon-solid" width="12" height="12"></svg><h4>Say "hi"</h4><p>Body text</p></div>"#);
}

#[test]
fn test_custom_trigger_from_json_options() {
    let options = CompilerOptions::from_json(r#"{"trigger": "ui"}"#).unwrap();
    let compiler = Compiler::with_options(site_layout(), options);
    let html = compiler
        .render_to_string("```ui\n\\PageUrl\n```\n\n```slotdown\n\\PageUrl\n```")
        .unwrap();
    assert_eq!(
        html,
        "<code></code><pre><code class=\"language-slotdown\">\\PageUrl\n</code></pre>"
    );
}

#[test]
fn test_compiler_from_registry() {
    let mut registry = Registry::new();
    registry.register_layout(site_layout());
    registry.register_layout(Layout::new("Bare"));
    assert_eq!(registry.layouts(), vec!["Bare", "Site"]);

    let bare = Compiler::from_registry(&registry, "bare", CompilerOptions::default()).unwrap();
    let err = bare.render_to_string(LANDING).unwrap_err();
    assert_snapshot!(err.to_string(), @"component Features not found");

    let site = Compiler::from_registry(&registry, "SITE", CompilerOptions::default()).unwrap();
    assert!(site.render_to_string(LANDING).is_ok());
}

#[test]
fn test_compiler_is_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}
    assert_send_sync(&*SITE);

    let expected = SITE.render_to_string(LANDING).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| SITE.render_to_string(LANDING).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_batch_renders_pages_into_layout() {
    let inputs: Vec<BatchInput> = (0..20)
        .map(|i| BatchInput {
            id: format!("page-{i}.md"),
            source: format!("```slotdown\n\\PageUrl\n```\n\nPage {i}"),
            page: Some(PageContext::new(format!("/p/{i}"))),
        })
        .collect();
    let options = BatchOptions {
        max_threads: Some(4),
        ..Default::default()
    };
    let out = render_batch(&SITE, inputs, &options);

    assert_eq!(out.stats.total, 20);
    assert_eq!(out.stats.succeeded, 20);
    assert_eq!(out.stats.failed, 0);
    for (i, result) in out.results.iter().enumerate() {
        assert_eq!(result.id, format!("page-{i}.md"));
        assert_eq!(
            result.output.as_deref(),
            Some(format!("<code>/p/{i}</code><p>Page {i}</p>").as_str())
        );
    }
}
