mod health;
mod link;
mod redirect;

pub use health::health_handler;
pub use link::{
    delete_link_handler, get_link_handler, list_links_handler, shorten_handler,
    update_link_handler,
};
pub use redirect::redirect_handler;
