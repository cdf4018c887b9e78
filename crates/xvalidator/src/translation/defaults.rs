//! Default templates for the built-in tags.

use super::catalog::Locale;

const EN: &[(&str, &str)] = &[
    ("required", "{0} is a required field"),
    ("email", "{0} must be a valid email address"),
    ("url", "{0} must be a valid URL"),
    ("uuid", "{0} must be a valid UUID"),
    ("len", "{0} must be {1} in length"),
    ("min", "{0} must be at least {1} in length"),
    ("max", "{0} must be at most {1} in length"),
    ("eq", "{0} is not equal to {1}"),
    ("ne", "{0} should not be equal to {1}"),
    ("gt", "{0} must be greater than {1}"),
    ("gte", "{0} must be {1} or greater"),
    ("lt", "{0} must be less than {1}"),
    ("lte", "{0} must be {1} or less"),
    ("oneof", "{0} must be one of [{1}]"),
    ("numeric", "{0} must be a valid numeric value"),
    ("number", "{0} must be a valid number"),
    ("alpha", "{0} can only contain alphabetic characters"),
    ("alphanum", "{0} can only contain alphanumeric characters"),
    ("lowercase", "{0} must be a lowercase string"),
    ("uppercase", "{0} must be an uppercase string"),
    ("contains", "{0} must contain the text '{1}'"),
    ("startswith", "{0} must start with text '{1}'"),
    ("endswith", "{0} must end with text '{1}'"),
    ("eqfield", "{0} must be equal to {1}"),
    ("nefield", "{0} cannot be equal to {1}"),
];

const RU: &[(&str, &str)] = &[
    ("required", "{0} обязательное поле"),
    ("email", "{0} должен быть email адресом"),
    ("url", "{0} должен быть URL"),
    ("uuid", "{0} должен быть UUID"),
    ("len", "{0} должен иметь длину {1}"),
    ("min", "{0} должен иметь длину не менее {1}"),
    ("max", "{0} должен иметь длину не более {1}"),
    ("eq", "{0} не равен {1}"),
    ("ne", "{0} должен быть не равен {1}"),
    ("gt", "{0} должен быть больше {1}"),
    ("gte", "{0} должен быть больше или равен {1}"),
    ("lt", "{0} должен быть меньше {1}"),
    ("lte", "{0} должен быть меньше или равен {1}"),
    ("oneof", "{0} должен быть одним из [{1}]"),
    ("numeric", "{0} должен быть цифровым значением"),
    ("number", "{0} должен быть цифрой"),
    ("alpha", "{0} должен содержать только буквы"),
    ("alphanum", "{0} должен содержать только буквы и цифры"),
    ("lowercase", "{0} должен быть строкой в нижнем регистре"),
    ("uppercase", "{0} должен быть строкой в верхнем регистре"),
    ("contains", "{0} должен содержать текст '{1}'"),
    ("startswith", "{0} должен начинаться с текста '{1}'"),
    ("endswith", "{0} должен заканчиваться текстом '{1}'"),
    ("eqfield", "{0} должен быть равен {1}"),
    ("nefield", "{0} не должен быть равен {1}"),
];

/// Built-in tag templates for `locale`.
pub(crate) fn templates(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => EN,
        Locale::Ru => RU,
    }
}
