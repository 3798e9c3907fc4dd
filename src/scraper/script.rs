use crate::scraper::driver::Locator;

/// Generates the in-page JavaScript run by [`ChromeSession`](crate::scraper::ChromeSession).
///
/// Every script resolves its [`Locator`] from scratch and returns an object
/// `{ found, value }`, so a missing element comes back as `found: false`
/// instead of a null that cannot be deserialized.
pub struct DomScript;

/// Returns true once the document has a body to query.
pub const BODY_READY: &str = "!!document.body";

impl DomScript {
    /// Count matches of `selector` below `within`.
    pub fn count(within: &Locator, selector: &str) -> String {
        let selector = js_string(selector);
        wrap(
            within,
            &format!("return {{ found: true, value: node.querySelectorAll({selector}).length }};"),
        )
    }

    /// Text content of `target`, falling back to the rendered text.
    pub fn text(target: &Locator) -> String {
        wrap(
            target,
            r#"
                const el = node === document ? document.documentElement : node;
                return { found: true, value: el.textContent || el.innerText || '' };
            "#,
        )
    }

    /// Attribute `name` of `target`; `value` is null when the attribute is absent.
    pub fn attribute(target: &Locator, name: &str) -> String {
        let name = js_string(name);
        wrap(
            target,
            &format!(
                "if (node === document) {{ return {{ found: false }}; }}\n\
                 return {{ found: true, value: node.getAttribute({name}) }};"
            ),
        )
    }

    /// Whether `target` takes up space and isn't hidden by style.
    pub fn visible(target: &Locator) -> String {
        wrap(
            target,
            r#"
                if (node === document) { return { found: true, value: true }; }
                const style = window.getComputedStyle(node);
                const shown = style.visibility !== 'hidden'
                    && style.display !== 'none'
                    && (node.offsetWidth > 0 || node.offsetHeight > 0 || node.getClientRects().length > 0);
                return { found: true, value: shown };
            "#,
        )
    }

    /// Click `target` through the DOM, which works for overlapped elements too.
    pub fn click(target: &Locator) -> String {
        wrap(
            target,
            r#"
                if (node === document) { return { found: false }; }
                node.click();
                return { found: true, value: true };
            "#,
        )
    }
}

fn wrap(locator: &Locator, body: &str) -> String {
    let steps = locator
        .steps()
        .iter()
        .map(|step| format!("[{}, {}]", js_string(&step.selector), step.index))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
        (() => {{
            let node = document;
            const steps = [{steps}];
            for (const [selector, index] of steps) {{
                node = node.querySelectorAll(selector)[index];
                if (!node) {{
                    return {{ found: false }};
                }}
            }}
            {body}
        }})()
        "#
    )
}

/// Quote `value` as a JavaScript string literal.
fn js_string(value: &str) -> String {
    // A JSON string is a valid JS string literal
    serde_json::to_string(value).unwrap_or_else(|_| "''".to_string())
}
