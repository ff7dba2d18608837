// src/models/auth.rs

use serde::{Deserialize, Serialize};

/// Nível a partir do qual o usuário é gerente (vê leads de qualquer vendedor).
pub const MANAGER_LEVEL: i32 = 4;

// Usuário autenticado, montado a partir das claims do token
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub seller_id: Option<i64>,
    pub level: i32,
}

impl User {
    pub fn is_manager(&self) -> bool {
        self.level >= MANAGER_LEVEL
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,            // ID do usuário
    pub seller: Option<i64>, // ID do vendedor vinculado, se houver
    #[serde(default)]
    pub level: i32,
    pub exp: usize,
    pub iat: usize,
}

impl From<Claims> for User {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            seller_id: claims.seller,
            level: claims.level,
        }
    }
}
