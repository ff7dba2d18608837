// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Catálogo de mensagens por idioma. As chaves são os códigos de erro
// (LEAD_NOT_FOUND...) e as chaves de validação (validation.required...).
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

const PT: &[(&str, &str)] = &[
    ("VALIDATION_ERROR", "Um ou mais campos são inválidos."),
    ("BAD_REQUEST", "Requisição inválida."),
    ("UNAUTHORIZED", "Token de autenticação inválido ou ausente."),
    ("FORBIDDEN", "Você não tem acesso a este recurso."),
    ("LEAD_NOT_FOUND", "Lead não encontrado."),
    ("ITEM_NOT_FOUND", "Item não encontrado neste lead."),
    ("ORDER_NOT_FOUND", "Pedido não encontrado."),
    ("LEAD_ALREADY_CONVERTED", "Este lead já foi convertido em pedido."),
    ("EMPTY_CART", "O lead não possui itens para converter."),
    ("SERVICE_UNAVAILABLE", "Serviço externo indisponível. Tente novamente."),
    ("DATABASE_ERROR", "Erro ao acessar o banco de dados."),
    ("INTERNAL_ERROR", "Ocorreu um erro inesperado."),
    ("validation.required", "Campo obrigatório."),
    ("validation.min_one", "Deve ser maior ou igual a 1."),
    ("validation.non_negative", "Não pode ser negativo."),
    ("validation.too_long", "Texto acima do tamanho permitido."),
    ("validation.out_of_range", "Valor fora do intervalo permitido."),
    ("validation.invalid", "Valor inválido."),
];

const EN: &[(&str, &str)] = &[
    ("VALIDATION_ERROR", "One or more fields are invalid."),
    ("BAD_REQUEST", "Malformed request."),
    ("UNAUTHORIZED", "Missing or invalid authentication token."),
    ("FORBIDDEN", "You do not have access to this resource."),
    ("LEAD_NOT_FOUND", "Lead not found."),
    ("ITEM_NOT_FOUND", "Item not found in this lead."),
    ("ORDER_NOT_FOUND", "Order not found."),
    ("LEAD_ALREADY_CONVERTED", "This lead was already converted into an order."),
    ("EMPTY_CART", "The lead has no items to convert."),
    ("SERVICE_UNAVAILABLE", "Upstream service unavailable. Please retry."),
    ("DATABASE_ERROR", "Database access failed."),
    ("INTERNAL_ERROR", "An unexpected error occurred."),
    ("validation.required", "This field is required."),
    ("validation.min_one", "Must be greater than or equal to 1."),
    ("validation.non_negative", "Must not be negative."),
    ("validation.too_long", "Text is longer than allowed."),
    ("validation.out_of_range", "Value out of the allowed range."),
    ("validation.invalid", "Invalid value."),
];

impl Default for I18nStore {
    fn default() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("pt", PT.iter().copied().collect());
        catalogs.insert("en", EN.iter().copied().collect());
        Self { catalogs }
    }
}

impl I18nStore {
    /// Traduz uma chave. Idioma desconhecido cai no português;
    /// chave desconhecida volta como está.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .unwrap_or(key)
            .to_string()
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.catalogs.get(lang).and_then(|c| c.get(key)).copied()
    }
}
