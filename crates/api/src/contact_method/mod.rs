pub mod create_contact_method;
mod delete_contact_method;
mod get_contact_methods;
mod update_contact_method;

use actix_web::web;
use create_contact_method::create_contact_method_controller;
use delete_contact_method::delete_contact_method_controller;
use get_contact_methods::get_contact_methods_controller;
use remind_domain::Channel;
use update_contact_method::update_contact_method_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/contact-methods",
        web::post().to(create_contact_method_controller),
    );
    cfg.route(
        "/contact-methods",
        web::get().to(get_contact_methods_controller),
    );
    cfg.route(
        "/contact-methods/{contact_method_id}",
        web::put().to(update_contact_method_controller),
    );
    cfg.route(
        "/contact-methods/{contact_method_id}",
        web::delete().to(delete_contact_method_controller),
    );
}

fn valid_channel(channel: &Channel) -> bool {
    match channel {
        Channel::Email(address) => address.contains('@'),
        Channel::Phone(number) => !number.trim().is_empty(),
    }
}
