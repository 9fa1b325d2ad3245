use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| {
            // TODO: restrict to public_base_url once deployments set it
            true
        })
        .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
