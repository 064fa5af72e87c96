pub mod typefall;
