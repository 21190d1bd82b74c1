use super::Document;
use crate::models::RecordKey;
use crate::Result;
use serde::Serialize;

/// Query that matches every document
pub const MATCH_ALL: &str = "*:*";

#[derive(Serialize)]
struct AddBody<'a> {
    doc: &'a Document,
}

#[derive(Serialize)]
struct DeleteQueryBody<'a> {
    query: &'a str,
}

/// One command in an update request
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateCommand {
    Add(Document),
    DeleteByIds(Vec<RecordKey>),
    DeleteQuery(String),
    Commit,
}

/// Builder for a Solr update request.
///
/// Commands are sent in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateQuery {
    commands: Vec<UpdateCommand>,
}

impl UpdateQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, document: Document) -> &mut Self {
        self.commands.push(UpdateCommand::Add(document));
        self
    }

    pub fn add_documents(&mut self, documents: impl IntoIterator<Item = Document>) -> &mut Self {
        self.commands
            .extend(documents.into_iter().map(UpdateCommand::Add));
        self
    }

    pub fn add_delete_by_ids(&mut self, ids: Vec<RecordKey>) -> &mut Self {
        self.commands.push(UpdateCommand::DeleteByIds(ids));
        self
    }

    pub fn add_delete_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.commands.push(UpdateCommand::DeleteQuery(query.into()));
        self
    }

    pub fn add_commit(&mut self) -> &mut Self {
        self.commands.push(UpdateCommand::Commit);
        self
    }

    #[must_use]
    pub fn commands(&self) -> &[UpdateCommand] {
        &self.commands
    }

    /// Documents queued for adding
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.commands.iter().filter_map(|command| match command {
            UpdateCommand::Add(document) => Some(document),
            _ => None,
        })
    }

    #[must_use]
    pub fn has_commit(&self) -> bool {
        self.commands.contains(&UpdateCommand::Commit)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Render the JSON update command body.
    ///
    /// Solr's JSON update format repeats `add` and `delete` keys within one
    /// object, which a JSON map cannot hold, so the object is assembled from
    /// individually serialized fragments. Ids are always sent as strings.
    pub fn to_json(&self) -> Result<String> {
        let mut fragments = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            let fragment = match command {
                UpdateCommand::Add(document) => {
                    format!("\"add\":{}", serde_json::to_string(&AddBody { doc: document })?)
                }
                UpdateCommand::DeleteByIds(ids) => {
                    let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                    format!("\"delete\":{}", serde_json::to_string(&ids)?)
                }
                UpdateCommand::DeleteQuery(query) => {
                    format!(
                        "\"delete\":{}",
                        serde_json::to_string(&DeleteQueryBody { query })?
                    )
                }
                UpdateCommand::Commit => "\"commit\":{}".to_string(),
            };
            fragments.push(fragment);
        }
        Ok(format!("{{{}}}", fragments.join(",")))
    }
}

/// A named filter query (`fq`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub key: String,
    pub query: String,
}

impl FilterQuery {
    pub fn new(key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            query: query.into(),
        }
    }
}

/// Builder for a Solr select request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    query: String,
    filter_queries: Vec<FilterQuery>,
    start: Option<u64>,
    rows: Option<u64>,
    fields: Vec<String>,
}

impl Default for SelectQuery {
    fn default() -> Self {
        Self::match_all()
    }
}

impl SelectQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filter_queries: Vec::new(),
            start: None,
            rows: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn match_all() -> Self {
        Self::new(MATCH_ALL)
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Attach a filter query. A filter with the same key is replaced.
    pub fn add_filter_query(&mut self, filter: FilterQuery) -> &mut Self {
        match self
            .filter_queries
            .iter_mut()
            .find(|existing| existing.key == filter.key)
        {
            Some(existing) => *existing = filter,
            None => self.filter_queries.push(filter),
        }
        self
    }

    #[must_use]
    pub fn filter_queries(&self) -> &[FilterQuery] {
        &self.filter_queries
    }

    pub fn set_start(&mut self, start: u64) -> &mut Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub const fn start(&self) -> Option<u64> {
        self.start
    }

    pub fn set_rows(&mut self, rows: u64) -> &mut Self {
        self.rows = Some(rows);
        self
    }

    #[must_use]
    pub const fn rows(&self) -> Option<u64> {
        self.rows
    }

    pub fn set_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Request parameters, `fq` repeated once per filter
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("q".to_string(), self.query.clone())];
        for filter in &self.filter_queries {
            params.push(("fq".to_string(), filter.query.clone()));
        }
        if let Some(start) = self.start {
            params.push(("start".to_string(), start.to_string()));
        }
        if let Some(rows) = self.rows {
            params.push(("rows".to_string(), rows.to_string()));
        }
        if !self.fields.is_empty() {
            params.push(("fl".to_string(), self.fields.join(",")));
        }
        params.push(("wt".to_string(), "json".to_string()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_update_json_keeps_command_order() {
        let mut doc = Document::new();
        doc.set("id", 5);
        doc.set("title", "Hello");

        let mut query = UpdateQuery::new();
        query
            .add_document(doc)
            .add_delete_by_ids(vec![RecordKey::Int(7), RecordKey::from("x-1")])
            .add_delete_query("_class:\"Post\"")
            .add_commit();

        assert_eq!(
            query.to_json().unwrap(),
            r#"{"add":{"doc":{"id":5,"title":"Hello"}},"delete":["7","x-1"],"delete":{"query":"_class:\"Post\""},"commit":{}}"#
        );
        assert!(query.has_commit());
        assert_eq!(query.documents().count(), 1);
    }

    #[test]
    fn test_empty_update_renders_empty_object() {
        let query = UpdateQuery::new();
        assert!(query.is_empty());
        assert_eq!(query.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_update_json_is_parseable_when_single_keyed() {
        let mut query = UpdateQuery::new();
        query.add_delete_by_ids(vec![RecordKey::Int(1)]).add_commit();
        let parsed: Value = serde_json::from_str(&query.to_json().unwrap()).unwrap();
        assert_eq!(parsed["delete"][0], "1");
        assert!(parsed["commit"].is_object());
    }

    #[test]
    fn test_select_params() {
        let mut query = SelectQuery::new("rust");
        query
            .add_filter_query(FilterQuery::new("status", "status:\"draft\""))
            .add_filter_query(FilterQuery::new("lang", "lang:\"en\""))
            .add_filter_query(FilterQuery::new("status", "status:\"active\""))
            .set_start(20)
            .set_rows(10)
            .set_fields(["id", "score"]);

        assert_eq!(
            query.to_params(),
            vec![
                ("q".to_string(), "rust".to_string()),
                ("fq".to_string(), "status:\"active\"".to_string()),
                ("fq".to_string(), "lang:\"en\"".to_string()),
                ("start".to_string(), "20".to_string()),
                ("rows".to_string(), "10".to_string()),
                ("fl".to_string(), "id,score".to_string()),
                ("wt".to_string(), "json".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_select_matches_all() {
        let query = SelectQuery::default();
        assert_eq!(query.query(), MATCH_ALL);
        assert_eq!(query.start(), None);
        assert_eq!(query.rows(), None);
        assert!(query.filter_queries().is_empty());
    }
}
