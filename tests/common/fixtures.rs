//! Test fixtures for Jira and Confluence payloads
//!
//! Realistic issue and page bodies as returned by the Jira and Confluence
//! REST APIs, trimmed to the fields the converters read.

use serde_json::json;

// Jira issue with an ADF description covering most node kinds
pub fn sample_issue_response() -> serde_json::Value {
  json!({
    "id": "10042",
    "key": "PLAT-311",
    "fields": {
      "summary": "Login fails after 2.4 upgrade",
      "description": {
        "type": "doc",
        "version": 1,
        "content": [
          {
            "type": "heading",
            "attrs": { "level": 2 },
            "content": [{ "type": "text", "text": "Summary" }]
          },
          {
            "type": "paragraph",
            "content": [
              { "type": "text", "text": "Login fails for " },
              { "type": "mention", "attrs": { "id": "557058:0c1f", "text": "@Jane Doe", "accessLevel": "" } },
              { "type": "text", "text": " after the " },
              { "type": "text", "text": "2.4", "marks": [{ "type": "code" }] },
              { "type": "text", "text": " upgrade " },
              { "type": "emoji", "attrs": { "shortName": ":warning:", "id": "atlassian-warning", "text": "⚠️" } }
            ]
          },
          {
            "type": "bulletList",
            "content": [
              {
                "type": "listItem",
                "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "Open the login page" }] }]
              },
              {
                "type": "listItem",
                "content": [{
                  "type": "paragraph",
                  "content": [{ "type": "text", "text": "Submit valid credentials", "marks": [{ "type": "strong" }] }]
                }]
              }
            ]
          },
          {
            "type": "codeBlock",
            "attrs": { "language": "text" },
            "content": [{ "type": "text", "text": "HTTP 500: session store unavailable" }]
          },
          {
            "type": "table",
            "attrs": { "isNumberColumnEnabled": false, "layout": "default" },
            "content": [
              {
                "type": "tableRow",
                "content": [
                  { "type": "tableHeader", "attrs": {}, "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "Env" }] }] },
                  { "type": "tableHeader", "attrs": {}, "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "Status" }] }] }
                ]
              },
              {
                "type": "tableRow",
                "content": [
                  { "type": "tableCell", "attrs": {}, "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "staging" }] }] },
                  { "type": "tableCell", "attrs": {}, "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "broken" }] }] }
                ]
              }
            ]
          },
          {
            "type": "mediaSingle",
            "attrs": { "layout": "center" },
            "content": [{ "type": "media", "attrs": { "id": "6e1c2d", "type": "file", "collection": "jira-10042" } }]
          },
          { "type": "rule" },
          {
            "type": "paragraph",
            "content": [
              { "type": "text", "text": "Line one" },
              { "type": "hardBreak" },
              { "type": "text", "text": "Line two" }
            ]
          }
        ]
      }
    }
  })
}

// Jira comment whose body arrives as JSON text rather than an object
pub fn sample_comment_response() -> serde_json::Value {
  json!({
    "id": "20311",
    "author": { "displayName": "Jane Doe" },
    "body": r#"{"type":"doc","version":1,"content":[{"type":"paragraph","content":[{"type":"text","text":"Fixed in "},{"type":"inlineCard","attrs":{"url":"https://example.atlassian.net/browse/PLAT-312"}},{"type":"text","text":"build 2.4.1"}]},{"type":"panel","attrs":{"panelType":"info"},"content":[{"type":"paragraph","content":[{"type":"text","text":"Redeploy staging first."}]}]}]}"#
  })
}

// Legacy Jira comment stored as wiki markup
pub fn sample_legacy_comment_response() -> serde_json::Value {
  json!({
    "id": "20007",
    "body": "Reproduced on *staging*, see {code}auth.log{code}"
  })
}

// Confluence page exercising macros, images, links and tables
pub fn sample_page_response() -> serde_json::Value {
  json!({
    "id": "229483",
    "type": "page",
    "status": "current",
    "title": "Release checklist",
    "body": {
      "storage": {
        "value": r#"<h1>Release checklist</h1>
<p>Owner: <ac:link><ri:user ri:account-id="5b10ac8d82e05b22cc7d4ef5" /></ac:link> &amp; the platform team.</p>
<ac:structured-macro ac:name="info" ac:schema-version="1" ac:macro-id="a1b2c3"><ac:parameter ac:name="title">Before you start</ac:parameter><ac:rich-text-body><p>Freeze merges to <code>main</code>.</p></ac:rich-text-body></ac:structured-macro>
<h2>Steps</h2>
<ol><li>Tag the release</li><li>Publish <em>notes</em></li></ol>
<ac:structured-macro ac:name="code" ac:schema-version="1"><ac:parameter ac:name="language">bash</ac:parameter><ac:plain-text-body><![CDATA[git tag -a v2.4.0 -m "Release 2.4.0"
git push --tags]]></ac:plain-text-body></ac:structured-macro>
<table data-layout="default" ac:local-id="9f1c"><colgroup><col style="width: 200.0px;" /><col style="width: 200.0px;" /></colgroup><tbody><tr><th><p>Service</p></th><th><p>Status</p></th></tr><tr><td><p>api</p></td><td><p><span style="color: rgb(54,179,126);">ready</span></p></td></tr></tbody></table>
<p><ac:image ac:align="center" ac:width="600"><ri:attachment ri:filename="pipeline.png" ri:version-at-save="1" /><ac:caption><p>Deployment pipeline</p></ac:caption></ac:image></p>"#,
        "representation": "storage"
      }
    },
    "version": { "number": 7 }
  })
}

// Confluence page with a merged-cell table and an alert
pub fn sample_complex_table_page_response() -> serde_json::Value {
  json!({
    "id": "345678",
    "type": "page",
    "status": "current",
    "title": "On-call rota",
    "body": {
      "storage": {
        "value": r#"<ac:structured-macro ac:name="warning" ac:schema-version="1"><ac:rich-text-body><p>Swap shifts only through the rota tool.</p></ac:rich-text-body></ac:structured-macro>
<table data-layout="wide"><tbody><tr><th colspan="2"><p>Week 12</p></th></tr><tr><td><p>Primary</p></td><td><p>Ana<br />Backup: Raj</p></td></tr></tbody></table>
<p>Escalate to <a href="https://example.atlassian.net/wiki/spaces/OPS">Ops</a>&nbsp;if nobody answers.</p>"#,
        "representation": "storage"
      }
    }
  })
}

/// Reads `body.storage.value` from a page response.
pub fn storage_value(page: &serde_json::Value) -> &str {
  page["body"]["storage"]["value"].as_str().unwrap()
}
