//! The depth-tracking validator.
//!
//! The [`Validator`] consumes tokens against the schema using an explicit
//! stack of schema positions. It opens a [`Record`] when the root tag opens,
//! fills leaf values as they arrive and hands the record over once the root
//! closes. Structural mistakes never stop the run: the validator reports them
//! and resynchronizes by popping the stack until some ancestor accepts the
//! offending tag.
//!
//! ## Decision table
//!
//! | State | Token | Action |
//! |-------|-------|--------|
//! | no record | `<root>` | open record, push root |
//! | no record | anything else | report |
//! | in record | close of top | pop, finish record if root |
//! | in record | other close | report, drop |
//! | container top | open of child | push child |
//! | container top | open of top | report, drop |
//! | container top | other open | report, recover |
//! | container top | value | report, drop |
//! | leaf top | value | store, expect close of top, pop |
//! | leaf top | open | report, recover |

use crate::diagnostics::Context;
use crate::{DiagnosticHandle, NodeId, Record, Schema, Token};

/// Whether a top-level instance is currently open.
#[derive(Debug)]
enum State {
    NoOpenRecord,
    InRecord(Record),
}

/// Schema-driven pushdown validator.
pub struct Validator<'s> {
    schema: &'s Schema,
    diagnostics: DiagnosticHandle,
    stack: Vec<NodeId>,
    state: State,
    records: Vec<Record>,
    token_count: usize,
}

impl<'s> Validator<'s> {
    pub fn new(schema: &'s Schema, diagnostics: DiagnosticHandle) -> Self {
        Validator {
            schema,
            diagnostics,
            stack: Vec::new(),
            state: State::NoOpenRecord,
            records: Vec::new(),
            token_count: 0,
        }
    }

    /// Drains `tokens` and returns every record whose root tag closed.
    ///
    /// With a channel receiver this blocks until the producer hangs up, so
    /// the returned list is final.
    pub fn run<I>(mut self, tokens: I) -> Vec<Record>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut tokens = tokens.into_iter();
        while let Some(token) = self.pull(&mut tokens) {
            self.step(token, &mut tokens);
        }

        if let State::InRecord(_) = self.state {
            tracing::debug!(
                depth = self.stack.len(),
                "input ended inside an open record; discarding it"
            );
        }
        tracing::debug!(
            tokens = self.token_count,
            records = self.records.len(),
            "validator drained token stream"
        );
        self.records
    }

    fn pull<I: Iterator<Item = Token>>(&mut self, tokens: &mut I) -> Option<Token> {
        let token = tokens.next()?;
        self.token_count += 1;
        Some(token)
    }

    fn error(&self, message: &str, token: &Token) {
        self.diagnostics.report(
            Context::Token(self.token_count),
            message,
            Some(&token.to_string()),
        );
    }

    fn step<I: Iterator<Item = Token>>(&mut self, token: Token, tokens: &mut I) {
        let Some(top) = self.stack.last().copied() else {
            self.start_record(token);
            return;
        };
        let schema = self.schema;
        let top_tag = schema.tag(top);

        match &token {
            Token::Close(name) if name == top_tag => self.close_top(),
            Token::Close(_) => {
                self.error(&format!("Not a proper closing tag to <{top_tag}>"), &token);
            }
            Token::Open(name) if !schema.node(top).is_leaf() => {
                if let Some(child) = schema.child(top, name) {
                    self.stack.push(child);
                } else if name == top_tag {
                    self.error("Current tag was opened again", &token);
                } else {
                    self.error(&format!("This does not belong after <{top_tag}> tag"), &token);
                    self.recover(name);
                }
            }
            Token::Open(name) => {
                self.error("Found tag instead of value", &token);
                self.recover(name);
            }
            Token::Value(_) if !schema.node(top).is_leaf() => {
                self.error(
                    &format!("Found value where a tag was expected in <{top_tag}>"),
                    &token,
                );
            }
            Token::Value(value) => {
                self.assign(top, value.clone(), &token);
                self.expect_close(top, tokens);
            }
        }
    }

    fn start_record(&mut self, token: Token) {
        let root = self.schema.root();
        match &token {
            Token::Open(name) if name == self.schema.root_tag() => {
                self.stack.push(root);
                self.state = State::InRecord(Record::new(self.schema));
            }
            _ => {
                let message = format!(
                    "Found text before <{}> tag was opened",
                    self.schema.root_tag()
                );
                self.error(&message, &token);
            }
        }
    }

    fn close_top(&mut self) {
        let popped = self.stack.pop();
        if popped == Some(self.schema.root()) {
            if let State::InRecord(record) =
                std::mem::replace(&mut self.state, State::NoOpenRecord)
            {
                self.records.push(record);
                tracing::trace!(records = self.records.len(), "record finalized");
            }
        }
    }

    fn assign(&mut self, node: NodeId, value: String, token: &Token) {
        if let State::InRecord(record) = &mut self.state {
            if let Err(rejection) = record.set_value(self.schema, node, value) {
                let message = rejection.to_string();
                self.diagnostics.report(
                    Context::Token(self.token_count),
                    message,
                    Some(&format!("<{}>", self.schema.tag(node))),
                );
                tracing::trace!(token = %token, "value dropped");
            }
        }
    }

    /// Consumes the token after a value; it should close the leaf.
    fn expect_close<I: Iterator<Item = Token>>(&mut self, leaf: NodeId, tokens: &mut I) {
        let Some(next) = self.pull(tokens) else {
            return;
        };
        if !next.closes(self.schema.tag(leaf)) {
            self.error(
                &format!("Not a proper closing tag to <{}>", self.schema.tag(leaf)),
                &next,
            );
        }
        self.stack.pop();
    }

    /// Pops the stack until an ancestor accepts `tag` as a child.
    ///
    /// Stops without pushing when only the root remains and `tag` is the root
    /// tag itself. If the stack empties, the open record is lost.
    fn recover(&mut self, tag: &str) {
        let root = self.schema.root();
        self.stack.pop();
        while let Some(&top) = self.stack.last() {
            if let Some(child) = self.schema.child(top, tag) {
                self.stack.push(child);
                return;
            }
            if top == root && tag == self.schema.root_tag() {
                return;
            }
            self.stack.pop();
        }

        if let State::InRecord(_) = std::mem::replace(&mut self.state, State::NoOpenRecord) {
            tracing::debug!(tag, "recovery emptied the stack; record discarded");
        }
    }
}
