mod subscribers_count;
mod subscriptions;
