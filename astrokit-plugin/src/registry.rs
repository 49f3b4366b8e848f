//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use astrokit_core::{codes, AstroError, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Central function registry
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => {
                debug!(function = name, args = args.len(), "calling function");
                f.call(args, ctx)
            }
            None => {
                let similar = self.find_similar_functions(name);
                let mut err = AstroError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use list_functions for the full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Function names similar to the given name, best match first
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                if score > 0 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        score += common * 2;

        let len_diff = (query.len() as i64 - candidate.len() as i64).unsigned_abs() as usize;
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.functions.get(&name.to_lowercase()) {
            Some(f) => Value::Object(function_to_help(f.meta())),
            None => Value::Error(AstroError::new(codes::NOT_FOUND,
                format!("No function named '{}'", name))),
        }
    }

    fn general_help(&self) -> Value {
        let mut by_category: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, f) in &self.functions {
            by_category.entry(f.meta().category.to_string()).or_default().push(name.clone());
        }

        let functions = by_category.into_iter()
            .map(|(cat, mut names)| {
                names.sort();
                (cat, Value::List(names.into_iter().map(Value::Text).collect()))
            });

        Value::object([
            ("functions", Value::object(functions)),
            ("usage", Value::Text("Call help('function_name') for detailed help.".to_string())),
        ])
    }

    /// List functions, optionally restricted to a category prefix
    /// (`"flux"` matches `"flux/luminosity"`).
    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let mut metas: Vec<FunctionMeta> = self.functions.values()
            .map(|f| f.meta())
            .filter(|m| category.map_or(true, |c| m.category == c || m.category.starts_with(&format!("{}/", c))))
            .collect();
        metas.sort_by_key(|m| m.name);

        Value::List(metas.into_iter()
            .map(|meta| Value::object([
                ("name", Value::from(meta.name)),
                ("description", Value::from(meta.description)),
                ("usage", Value::from(meta.usage)),
                ("category", Value::from(meta.category)),
            ]))
            .collect())
    }
}

fn function_to_help(meta: FunctionMeta) -> HashMap<String, Value> {
    let mut help = HashMap::new();
    help.insert("name".to_string(), Value::from(meta.name));
    help.insert("description".to_string(), Value::from(meta.description));
    help.insert("usage".to_string(), Value::from(meta.usage));
    help.insert("returns".to_string(), Value::from(meta.returns));
    help.insert("category".to_string(), Value::from(meta.category));
    help.insert("args".to_string(), Value::List(
        meta.args.iter().map(|a| Value::object([
            ("name", Value::from(a.name)),
            ("type", Value::from(a.typ)),
            ("description", Value::from(a.description)),
            ("optional", Value::Bool(a.optional)),
            ("default", Value::from(a.default)),
        ])).collect()
    ));
    help.insert("examples".to_string(), Value::List(
        meta.examples.iter().map(|e| Value::from(*e)).collect()
    ));
    help.insert("related".to_string(), Value::List(
        meta.related.iter().map(|r| Value::from(*r)).collect()
    ));
    help
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
