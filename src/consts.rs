// 配置相关
pub const APP_DIR: &str = "multimodal-quickstart";
pub const USER_CONFIG_FILE: &str = "config.toml";
pub const PROJECT_CONFIG_FILE: &str = "quickstart.toml";
pub const ENV_PREFIX: &str = "QUICKSTART";
pub const ENV_PROJECT_DIR: &str = "QUICKSTART_PROJECT_DIR";

// 解释器
#[cfg(windows)]
pub const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_PYTHON: &str = "python3";
pub const MIN_PYTHON_VERSION: &str = "3.8";

// 依赖清单
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
pub const PINNED_REQUIREMENTS: &[(&str, &str)] = &[
    ("torch", "2.0.1"),
    ("torchvision", "0.15.2"),
    ("torchaudio", "2.0.2"),
    ("numpy", "1.24.3"),
    ("pandas", "2.0.3"),
    ("scikit-learn", "1.3.0"),
    ("scipy", "1.11.1"),
    ("opencv-python", "4.8.0.76"),
    ("Pillow", "10.0.0"),
    ("matplotlib", "3.7.2"),
    ("seaborn", "0.12.2"),
    ("librosa", "0.10.1"),
    ("soundfile", "0.12.1"),
    ("streamlit", "1.25.0"),
    ("plotly", "5.15.0"),
    ("tqdm", "4.65.0"),
    ("pyyaml", "6.0.1"),
    ("transformers", "4.31.0"),
    ("nltk", "3.8.1"),
];

// 硬件
pub const LOW_MEMORY_THRESHOLD_GB: f64 = 6.0;
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

// 演示数据
pub const DEMO_DATA_DIR: &str = "datasets/demo";
pub const DEMO_SAMPLES: usize = 50;

// 模型冒烟测试
pub const MODEL_SOURCE_DIR: &str = "src";
pub const NUM_CLASSES: usize = 10;
pub const IMAGE_INPUT_SHAPE: [usize; 4] = [1, 3, 224, 224];
pub const AUDIO_SAMPLE_RATE: usize = 16_000;
pub const AUDIO_SECONDS: usize = 3;
pub const TEXT_SEQUENCE_LENGTH: usize = 256;
pub const TEXT_VOCAB_SIZE: i64 = 1000;

// 应用与测试
pub const APP_ENTRY: &str = "app/main.py";
pub const APP_LAUNCHER: &str = "app/run_app.py";
pub const TEST_DIR: &str = "tests";
pub const REPORT_FILE: &str = "SETUP_REPORT.txt";
pub const APP_URL: &str = "http://localhost:8501";
pub const SUPPORT_CONTACT: &str = "research@srmist.edu.in";

// 步骤名称
pub const STEP_PYTHON_VERSION: &str = "Python Version";
pub const STEP_DEPENDENCIES: &str = "Dependencies";
pub const STEP_HARDWARE: &str = "Hardware Check";
pub const STEP_DEMO_DATA: &str = "Demo Data";
pub const STEP_MODELS: &str = "Model Tests";
pub const STEP_APP: &str = "App Tests";
pub const STEP_TEST_SUITE: &str = "Test Suite";

// 提示消息
pub const MSG_BANNER: &str = "
MULTIMODAL CNN ANALYSIS - QUICK START
SRM Institute Major Project (Zeroth -> Final Review)

Setting up your complete multimodal deep learning system...
";
pub const MSG_STEP: &str = "Step: {}";
pub const MSG_SETUP_INCOMPLETE: &str = "Setup incomplete. Failed steps: {}";
pub const MSG_SETUP_COMPLETE: &str = "Setup completed successfully!";
pub const MSG_SYSTEM_READY: &str = "Your multimodal CNN analysis system is ready!";
pub const MSG_PRO_TIP: &str = "Pro tip: Run 'python app/run_app.py' to start the application!";
pub const MSG_NEED_HELP: &str = "Need help? Contact: {}";
pub const TROUBLESHOOTING_HINTS: &[&str] = &[
    "Check Python version (3.8+ required)",
    "Ensure sufficient disk space and internet connection",
    "Try running with administrator privileges",
    "Check that all system requirements are met",
];
