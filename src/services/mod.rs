// BookWise services
// Backend API access, contact delivery, settings, localization, and the pure
// helpers used by the blog pages (catalog paging, image URL sanitising).

pub mod api_client;
pub mod blog_catalog;
pub mod contact_service;
pub mod image_url;
pub mod localization_engine;
pub mod settings_engine;
