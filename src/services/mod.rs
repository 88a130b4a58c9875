pub mod alert_service;
pub mod content_parser;
pub mod html_entities;
pub mod leaderboard_service;
pub mod news_service;
pub mod notification_service;
pub mod points_service;
pub mod portfolio_service;
pub mod scheduler_service;
pub mod translation_service;
