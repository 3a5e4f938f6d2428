use axum::Json;
use serde_json::{json, Value};

fn item_schema() -> Value {
    json!({
        "type": "object",
        "required": ["id", "name", "description", "photoUrl"],
        "properties": {
            "id": { "type": "string", "example": "1" },
            "name": { "type": "string", "example": "Drill" },
            "description": { "type": "string", "example": "" },
            "photoUrl": {
                "type": "string",
                "nullable": true,
                "example": "http://localhost:3000/inventory/1/photo"
            }
        }
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn reply(description: &str) -> Value {
    json!({ "description": description })
}

fn item_reply(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/Item" } }
        }
    })
}

/// OpenAPI description of the route surface
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Inventory Service",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Register inventory items with an optional photo and manage them by id."
        },
        "paths": {
            "/register": {
                "post": {
                    "summary": "Register an item",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "multipart/form-data": {
                                "schema": {
                                    "type": "object",
                                    "required": ["inventory_name"],
                                    "properties": {
                                        "inventory_name": { "type": "string" },
                                        "description": { "type": "string" },
                                        "photo": { "type": "string", "format": "binary" }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "201": item_reply("Item registered"),
                        "400": reply("inventory_name is missing")
                    }
                }
            },
            "/inventory": {
                "get": {
                    "summary": "List all items",
                    "responses": {
                        "200": {
                            "description": "All items ordered by id",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Item" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "/inventory/{id}": {
                "get": {
                    "summary": "Get an item",
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": item_reply("The item"),
                        "400": reply("Malformed id"),
                        "404": reply("Item not found")
                    }
                },
                "put": {
                    "summary": "Update name and/or description",
                    "parameters": [id_parameter()],
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "additionalProperties": false,
                                    "properties": {
                                        "name": { "type": "string" },
                                        "description": { "type": "string", "nullable": true }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": item_reply("Updated item"),
                        "400": reply("Invalid body or id"),
                        "404": reply("Item not found")
                    }
                },
                "delete": {
                    "summary": "Delete an item",
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": reply("Item deleted"),
                        "404": reply("Item not found")
                    }
                }
            },
            "/inventory/{id}/photo": {
                "get": {
                    "summary": "Download the item's photo",
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": {
                            "description": "Photo bytes",
                            "content": {
                                "image/jpeg": { "schema": { "type": "string", "format": "binary" } }
                            }
                        },
                        "404": reply("Item or photo not found")
                    }
                },
                "put": {
                    "summary": "Replace the item's photo",
                    "parameters": [id_parameter()],
                    "requestBody": {
                        "content": {
                            "multipart/form-data": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "photo": { "type": "string", "format": "binary" }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": item_reply("Updated item"),
                        "400": reply("Photo missing"),
                        "404": reply("Item not found")
                    }
                }
            },
            "/search": {
                "post": {
                    "summary": "Find an item by id",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/x-www-form-urlencoded": {
                                "schema": {
                                    "type": "object",
                                    "required": ["id"],
                                    "properties": {
                                        "id": { "type": "string" },
                                        "has_photo": {
                                            "type": "string",
                                            "description": "Append the photo link to the description; any value except false, 0, no or off"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": item_reply("The item"),
                        "400": reply("Missing or malformed id"),
                        "404": reply("Item not found")
                    }
                }
            }
        },
        "components": {
            "schemas": { "Item": item_schema() }
        }
    })
}

/// Serve the API description
/// GET /docs
pub async fn api_docs() -> Json<Value> {
    Json(openapi_document())
}
