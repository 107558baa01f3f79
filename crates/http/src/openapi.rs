//! Merges per-module OpenAPI fragments into one document.

use bookshelf_kernel::ModuleRegistry;
use serde_json::{json, Value};

pub const API_TITLE: &str = "Bookshelf API";
pub const API_VERSION: &str = "1.0.0";

/// Build the merged OpenAPI document served under `/openapi.json`.
pub fn build_openapi(registry: &ModuleRegistry) -> Value {
    let mut spec = json!({
        "openapi": "3.1.0",
        "info": {
            "title": API_TITLE,
            "version": API_VERSION,
            "description": "In-memory book collection service"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    spec["components"]["schemas"]["MessageResponse"] = json!({
        "type": "object",
        "properties": {
            "message": {
                "type": "string"
            }
        },
        "required": ["message"]
    });

    spec["paths"]["/healthz"] = json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "text/plain": {
                            "schema": {
                                "type": "string"
                            }
                        }
                    }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(fragment) = module.openapi() else {
            continue;
        };
        let base_path = module.base_path();

        if let Some(paths) = fragment.get("paths").and_then(Value::as_object) {
            for (path, path_item) in paths {
                let full_path = join_path(&base_path, path);
                spec["paths"][full_path] = path_item.clone();
            }
        }

        if let Some(schemas) = fragment
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(Value::as_object)
        {
            for (schema_name, schema_def) in schemas {
                spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    spec
}

/// Check the merged JSON against utoipa's typed OpenAPI model.
pub fn validate(spec: &Value) -> Result<utoipa::openapi::OpenApi, serde_json::Error> {
    serde_json::from_value(spec.clone())
}

fn join_path(base_path: &str, path: &str) -> String {
    let base_path = base_path.trim_end_matches('/');
    if path == "/" && !base_path.is_empty() {
        base_path.to_string()
    } else {
        format!("{}{}", base_path, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_kernel::Module;
    use std::sync::Arc;

    struct Fragment {
        name: &'static str,
        base_path: &'static str,
    }

    #[async_trait::async_trait]
    impl Module for Fragment {
        fn name(&self) -> &'static str {
            self.name
        }

        fn base_path(&self) -> String {
            self.base_path.to_string()
        }

        fn openapi(&self) -> Option<Value> {
            Some(json!({
                "paths": {
                    "/": { "get": { "responses": { "200": { "description": "OK" } } } },
                    "/items": { "get": { "responses": { "200": { "description": "OK" } } } }
                },
                "components": {
                    "schemas": {
                        "Item": { "type": "object" }
                    }
                }
            }))
        }
    }

    #[test]
    fn test_empty_registry_document_is_valid() {
        let typed = validate(&build_openapi(&ModuleRegistry::new())).unwrap();
        assert_eq!(typed.info.version, API_VERSION);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "/books"), "/books");
        assert_eq!(join_path("", "/"), "/");
        assert_eq!(join_path("/api/users", "/"), "/api/users");
        assert_eq!(join_path("/api/users/", "/profile"), "/api/users/profile");
    }

    #[test]
    fn test_fragments_are_prefixed_and_merged() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(Fragment {
            name: "items",
            base_path: "/api/items",
        }));

        let spec = build_openapi(&registry);
        assert!(spec["paths"]["/api/items"].is_object());
        assert!(spec["paths"]["/api/items/items"].is_object());
        assert!(spec["paths"]["/healthz"].is_object());
        assert!(spec["components"]["schemas"]["Item"].is_object());
        assert!(spec["components"]["schemas"]["MessageResponse"].is_object());
    }

    #[test]
    fn test_merged_document_is_valid_openapi() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(Fragment {
            name: "root",
            base_path: "",
        }));

        let typed = validate(&build_openapi(&registry)).unwrap();
        assert_eq!(typed.info.title, API_TITLE);
        assert!(typed.paths.paths.contains_key("/items"));
    }
}
