//! Declaration lookup with fuzzy suggestions

use crate::error::SymbolLookupError;
use crate::table::SymbolSource;
use crate::types::ClassDecl;
use strsim::levenshtein;

/// A fuzzy match suggestion with candidate name and edit distance.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub candidate: String,
    pub distance: usize,
}

/// Which annotation made a declaration interesting to the processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Route,
    Interceptor,
    Autowired,
    Param,
}

/// A single search result from [`search_declarations`].
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub qualified_name: String,
    pub annotations: Vec<AnnotationKind>,
}

/// Suggest similar names from a list of candidates using fuzzy matching.
///
/// Returns candidates sorted by edit distance (closest first).
/// Exact matches are excluded. Case-insensitive matches get distance 0,
/// substring matches get distance 1, and Levenshtein matches use their
/// actual edit distance.
pub fn suggest_similar(name: &str, candidates: &[&str], max_distance: usize) -> Vec<Suggestion> {
    let name_lower = name.to_lowercase();
    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|&candidate| {
            if candidate == name {
                return None;
            }
            let candidate_lower = candidate.to_lowercase();
            if candidate_lower == name_lower {
                return Some(Suggestion {
                    candidate: candidate.to_string(),
                    distance: 0,
                });
            }
            if candidate_lower.contains(&name_lower) || name_lower.contains(&candidate_lower) {
                return Some(Suggestion {
                    candidate: candidate.to_string(),
                    distance: 1,
                });
            }
            let dist = levenshtein(name, candidate);
            if dist <= max_distance {
                Some(Suggestion {
                    candidate: candidate.to_string(),
                    distance: dist,
                })
            } else {
                None
            }
        })
        .collect();
    suggestions.sort_by_key(|s| s.distance);
    suggestions
}

/// Look a declaration up by qualified or simple name.
///
/// A simple name only resolves when it is unambiguous; otherwise the
/// qualified candidates come back as suggestions.
pub fn find_declaration<'a>(
    source: &'a dyn SymbolSource,
    name: &str,
) -> Result<&'a ClassDecl, SymbolLookupError> {
    if let Some(decl) = source.resolve(name) {
        return Ok(decl);
    }

    let by_simple: Vec<&ClassDecl> = source
        .declarations()
        .iter()
        .filter(|decl| decl.simple_name() == name)
        .collect();
    if let [only] = by_simple.as_slice() {
        return Ok(*only);
    }

    let suggestions = if by_simple.is_empty() {
        let simple_names: Vec<&str> = source
            .declarations()
            .iter()
            .map(|decl| decl.simple_name())
            .collect();
        let qualified: Vec<&str> = source
            .declarations()
            .iter()
            .map(|decl| decl.qualified_name.as_str())
            .collect();
        let mut found = suggest_similar(name, &qualified, 3);
        for simple in suggest_similar(name, &simple_names, 3) {
            if let Some(decl) = source
                .declarations()
                .iter()
                .find(|decl| decl.simple_name() == simple.candidate)
            {
                found.push(Suggestion {
                    candidate: decl.qualified_name.clone(),
                    distance: simple.distance,
                });
            }
        }
        found.sort_by_key(|s| s.distance);
        found.dedup_by(|a, b| a.candidate == b.candidate);
        found
    } else {
        by_simple
            .iter()
            .map(|decl| Suggestion {
                candidate: decl.qualified_name.clone(),
                distance: 0,
            })
            .collect()
    };

    Err(SymbolLookupError::NotFound {
        input: name.to_string(),
        suggestions,
    })
}

/// Case-insensitive substring search over annotated declarations.
pub fn search_declarations(source: &dyn SymbolSource, query: &str) -> Vec<SearchResult> {
    let q = query.to_lowercase();
    source
        .declarations()
        .iter()
        .filter(|decl| decl.qualified_name.to_lowercase().contains(&q))
        .filter_map(|decl| {
            let mut annotations = Vec::new();
            if decl.annotations.route.is_some() {
                annotations.push(AnnotationKind::Route);
            }
            if decl.annotations.interceptor.is_some() {
                annotations.push(AnnotationKind::Interceptor);
            }
            if decl.properties.iter().any(|p| p.autowired.is_some()) {
                annotations.push(AnnotationKind::Autowired);
            }
            if decl.properties.iter().any(|p| p.param.is_some()) {
                annotations.push(AnnotationKind::Param);
            }
            if annotations.is_empty() {
                return None;
            }
            Some(SearchResult {
                qualified_name: decl.qualified_name.clone(),
                annotations,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SymbolTable;
    use crate::types::{InterceptorAnnotation, RouteAnnotation};

    fn sample() -> SymbolTable {
        let mut main = ClassDecl::new("com.example.MainActivity");
        main.annotations.route = Some(RouteAnnotation::new("/main/home"));
        let mut login = ClassDecl::new("com.example.login.LoginInterceptor");
        login.annotations.interceptor = Some(InterceptorAnnotation {
            priority: 1,
            name: String::new(),
        });
        let mut table = SymbolTable::new();
        table.extend(vec![main, login, ClassDecl::new("android.app.Activity")]);
        table
    }

    #[test]
    fn test_fuzzy_suggestions() {
        let candidates = ["MainActivity", "LoginInterceptor"];
        let suggestions = suggest_similar("MainActvity", &candidates, 3);
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].candidate, "MainActivity");
    }

    #[test]
    fn test_fuzzy_no_exact_match() {
        let candidates = ["MainActivity"];
        let suggestions = suggest_similar("MainActivity", &candidates, 3);
        assert!(suggestions.is_empty(), "exact matches should be excluded");
    }

    #[test]
    fn test_find_by_simple_name() {
        let table = sample();
        let decl = find_declaration(&table, "MainActivity").expect("should resolve");
        assert_eq!(decl.qualified_name, "com.example.MainActivity");
    }

    #[test]
    fn test_find_suggests_on_typo() {
        let table = sample();
        let err = find_declaration(&table, "MainActivty").unwrap_err();
        match err {
            SymbolLookupError::NotFound { suggestions, .. } => {
                assert_eq!(suggestions[0].candidate, "com.example.MainActivity");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_search_skips_unannotated() {
        let table = sample();
        let results = search_declarations(&table, "activity");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].annotations, vec![AnnotationKind::Route]);
    }
}
