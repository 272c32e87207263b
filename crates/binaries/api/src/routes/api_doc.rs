use crate::routes::{album, photos, root};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        // Album handlers
        album::handlers::create_album_handler,
        album::handlers::list_albums_handler,
        album::handlers::view_album_handler,
        album::handlers::view_album_with_ticket_handler,
        album::handlers::share_album_handler,
        album::handlers::upload_photos_handler,
        // Photos handlers
        photos::handlers::get_photo_handler,
        photos::handlers::serve_photo_handler,
        photos::handlers::serve_photo_size_handler,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Album", description = "Albums, sharing and uploads"),
        (name = "Photos", description = "Photo details and image files"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
