//! The place where the CLI parser and the shell command parser are defined.
//!
//! The shell speaks a small command language, one command per line:
//!
//! - tables | create name | use name | droptable name
//! - column name default | drop name
//! - insert literal*
//! - select [cols|*] [where col op literal] [order col asc|desc]
//! - delete [index | where col op literal]
//! - update col literal [where col op literal]
//! - sort col [asc|desc]
//! - json
//!
//! Literals are `null`, `true`/`false`, integers, decimals, `'text'`,
//! `d'2024-01-31'`, `t'12:30:00'`, `dt'2024-01-31 12:30:00'`, `j'{"k": 1}'`
//! and bare words, which are read as text. Operators must be separated from
//! their operands by whitespace.

use std::{cmp::Ordering, path::PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, ValueEnum, arg, command};

use crate::persistence::{OrderSpec, Row, Value};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(version, about = "An in-memory, schema-typed table engine", long_about = None)]
pub struct CliParser {
    // Either run the interactive shell or the scripted demo.
    #[arg(required = true)]
    pub mode: Option<CliMode>,

    // A JSON file with engine settings.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
pub enum CliMode {
    // Start a REPL client instance.
    Client,

    // Run a short scripted session and exit.
    Demo,
}

/// The comparison a `where` clause applies between a cell and a literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
}

impl Operator {
    fn _parse(token: &str) -> Result<Operator, String> {
        match token {
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "~" => Ok(Operator::Contains),
            other => Err(format!("invalid operator {}", other)),
        }
    }
}

/// A single `column operator literal` predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn matches(&self, row: &Row) -> bool {
        //! Evaluate the predicate on one row.
        //!
        //! Null only ever equals null. Whole numbers and decimals compare
        //! by value; other kinds that can not be compared never match.

        let cell = match row.get(&self.column) {
            Ok(cell) => cell,
            Err(_) => return false,
        };

        if self.operator == Operator::Contains {
            return !cell.is_null() && cell.contains(&self.value.to_string());
        }

        if cell.is_null() || self.value.is_null() {
            let both = cell.is_null() && self.value.is_null();
            return match self.operator {
                Operator::Eq => both,
                Operator::Ne => !both,
                _ => false,
            };
        }

        let ordering = match _ordering(cell.value(), &self.value) {
            Some(ordering) => ordering,
            None => return self.operator == Operator::Ne,
        };

        match self.operator {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
            Operator::Contains => false,
        }
    }
}

fn _ordering(left: &Value, right: &Value) -> Option<Ordering> {
    let numeric = |value: &Value| match value {
        Value::Int(number) => Some(f64::from(*number)),
        Value::Long(number) => Some(*number as f64),
        Value::Double(number) => Some(*number),
        _ => None,
    };

    left.compare(right).or_else(|| match (numeric(left), numeric(right)) {
        (Some(left), Some(right)) => left.partial_cmp(&right),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    All,
    Row(usize),
    Where(Condition),
}

/// One parsed line of the shell language.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Tables,
    CreateTable(String),
    UseTable(String),
    DropTable(String),
    CreateColumn {
        name: String,
        default: Value,
    },
    DropColumn(String),
    Insert(Vec<Value>),
    Select {
        columns: Option<Vec<String>>,
        condition: Option<Condition>,
        order: Option<OrderSpec>,
    },
    Delete(DeleteTarget),
    Update {
        column: String,
        value: Value,
        condition: Option<Condition>,
    },
    Sort(OrderSpec),
    Json,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted { prefix: String, text: String },
}

impl Token {
    fn word(&self) -> Option<&str> {
        match self {
            Token::Word(word) => Some(word.as_str()),
            Token::Quoted { .. } => None,
        }
    }
}

fn _tokenize(line: &str) -> Result<Vec<Token>, String> {
    //! Split a line on whitespace. A quote opens a literal that runs to the
    //! matching quote; letters glued in front of it become its prefix.

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let mut text = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == c {
                        closed = true;
                        break;
                    }
                    text.push(next);
                }
                if !closed {
                    return Err(format!("unterminated literal {}{}", c, text));
                }
                tokens.push(Token::Quoted {
                    prefix: std::mem::take(&mut current).to_lowercase(),
                    text,
                });
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut current)));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(Token::Word(current));
    }

    Ok(tokens)
}

fn _parse_literal(token: &Token) -> Result<Value, String> {
    match token {
        Token::Quoted { prefix, text } => match prefix.as_str() {
            "" => Ok(Value::Text(text.clone())),
            "d" => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| format!("invalid value {}: not a date (YYYY-MM-DD)", text)),
            "t" => NaiveTime::parse_from_str(text, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
                .map(Value::Time)
                .map_err(|_| format!("invalid value {}: not a time (HH:MM:SS)", text)),
            "dt" => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
                .map(Value::DateTime)
                .map_err(|_| {
                    format!("invalid value {}: not a datetime (YYYY-MM-DD HH:MM:SS)", text)
                }),
            "j" => serde_json::from_str(text)
                .map(Value::Json)
                .map_err(|e| format!("invalid value {}: {}", text, e)),
            other => Err(format!("invalid literal prefix {}", other)),
        },
        Token::Word(word) => {
            if word.eq_ignore_ascii_case("null") {
                return Ok(Value::Null);
            }
            if word.eq_ignore_ascii_case("true") {
                return Ok(Value::Boolean(true));
            }
            if word.eq_ignore_ascii_case("false") {
                return Ok(Value::Boolean(false));
            }
            if let Ok(number) = word.parse::<i64>() {
                return Ok(match i32::try_from(number) {
                    Ok(number) => Value::Int(number),
                    Err(_) => Value::Long(number),
                });
            }
            if word.chars().any(|c| c.is_ascii_digit()) {
                if let Ok(number) = word.parse::<f64>() {
                    return Ok(Value::Double(number));
                }
            }
            Ok(Value::Text(word.clone()))
        }
    }
}

/// A cursor over the tokens of one line.
struct ShellParser {
    tokens: Vec<Token>,
    position: usize,
}

impl ShellParser {
    fn _next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn _peek_word(&self) -> Option<&str> {
        self.tokens.get(self.position).and_then(Token::word)
    }

    fn _is_done(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn _name(&mut self, what: &str) -> Result<String, String> {
        match self._next() {
            Some(Token::Word(word)) => Ok(word.clone()),
            Some(Token::Quoted { text, .. }) => Err(format!("invalid {} name '{}'", what, text)),
            None => Err(format!("missing {} name", what)),
        }
    }

    fn _literal(&mut self) -> Result<Value, String> {
        match self._next() {
            Some(token) => _parse_literal(token),
            None => Err("missing value".to_string()),
        }
    }

    fn _end(&self) -> Result<(), String> {
        match self.tokens.get(self.position) {
            None => Ok(()),
            Some(Token::Word(word)) => Err(format!("unexpected '{}'", word)),
            Some(Token::Quoted { text, .. }) => Err(format!("unexpected '{}'", text)),
        }
    }

    fn _condition(&mut self) -> Result<Condition, String> {
        let column = self._name("column")?;
        let operator = match self._next() {
            Some(Token::Word(word)) => Operator::_parse(word)?,
            _ => return Err("missing operator after the column".to_string()),
        };
        let value = self._literal()?;

        Ok(Condition {
            column,
            operator,
            value,
        })
    }

    fn _order(&mut self) -> Result<OrderSpec, String> {
        let column = self._name("column")?;
        let order = match self._peek_word().map(str::to_lowercase).as_deref() {
            Some("asc") => {
                self.position += 1;
                OrderSpec::asc(column)
            }
            Some("desc") => {
                self.position += 1;
                OrderSpec::desc(column)
            }
            _ => OrderSpec::asc(column),
        };
        Ok(order)
    }

    fn _optional_where(&mut self) -> Result<Option<Condition>, String> {
        if self._peek_word().is_some_and(|word| word.eq_ignore_ascii_case("where")) {
            self.position += 1;
            return Ok(Some(self._condition()?));
        }
        Ok(None)
    }

    fn _select(&mut self) -> Result<ShellCommand, String> {
        let mut columns: Option<Vec<String>> = None;

        while let Some(word) = self._peek_word() {
            if word.eq_ignore_ascii_case("where") || word.eq_ignore_ascii_case("order") {
                break;
            }
            let word = word.to_string();
            self.position += 1;
            if word == "*" {
                continue;
            }
            columns.get_or_insert_with(Vec::new).extend(
                word.split(',')
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            );
        }

        let condition = self._optional_where()?;
        let order = if self._peek_word().is_some_and(|word| word.eq_ignore_ascii_case("order")) {
            self.position += 1;
            if self._peek_word().is_some_and(|word| word.eq_ignore_ascii_case("by")) {
                self.position += 1;
            }
            Some(self._order()?)
        } else {
            None
        };
        self._end()?;

        Ok(ShellCommand::Select {
            columns,
            condition,
            order,
        })
    }
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    //! Parse one line of the shell language into a [`ShellCommand`].

    let tokens = _tokenize(line)?;
    let mut parser = ShellParser {
        tokens,
        position: 0,
    };

    let keyword = match parser._next() {
        Some(Token::Word(word)) => word.to_lowercase(),
        Some(Token::Quoted { text, .. }) => return Err(format!("unknown command '{}'", text)),
        None => return Err("empty command".to_string()),
    };

    let command = match keyword.as_str() {
        "tables" => ShellCommand::Tables,
        "create" => ShellCommand::CreateTable(parser._name("table")?),
        "use" => ShellCommand::UseTable(parser._name("table")?),
        "droptable" => ShellCommand::DropTable(parser._name("table")?),
        "column" => {
            let name = parser._name("column")?;
            let default = parser._literal()?;
            ShellCommand::CreateColumn { name, default }
        }
        "drop" => ShellCommand::DropColumn(parser._name("column")?),
        "insert" => {
            let mut values = Vec::new();
            while !parser._is_done() {
                values.push(parser._literal()?);
            }
            if values.is_empty() {
                return Err("insert needs at least one value".to_string());
            }
            ShellCommand::Insert(values)
        }
        "select" => return parser._select(),
        "delete" => {
            let target = match parser._peek_word() {
                None if parser._is_done() => DeleteTarget::All,
                Some(word) if word.eq_ignore_ascii_case("where") => {
                    parser.position += 1;
                    DeleteTarget::Where(parser._condition()?)
                }
                Some(word) => {
                    let index = word
                        .parse::<usize>()
                        .map_err(|_| format!("invalid row index {}", word))?;
                    parser.position += 1;
                    DeleteTarget::Row(index)
                }
                None => return Err("invalid delete target".to_string()),
            };
            ShellCommand::Delete(target)
        }
        "update" => {
            let column = parser._name("column")?;
            let value = parser._literal()?;
            let condition = parser._optional_where()?;
            ShellCommand::Update {
                column,
                value,
                condition,
            }
        }
        "sort" => ShellCommand::Sort(parser._order()?),
        "json" => ShellCommand::Json,
        other => return Err(format!("unknown command '{}'", other)),
    };

    parser._end()?;
    Ok(command)
}
